//! Annualized return on stake for a single pool.
//!
//! ```text
//! pot      = rho * reserves * (1 - tau)
//! divisor  = 1 + a0   (1 under `max` rewards)
//! reward   = pot / divisor * f * reward_scale
//! roi      = reward / stake * 73 * 100
//! ```
//!
//! Under `full` and `max` rewards, stake and pledge are first mapped onto the
//! assumed staked supply with the normalizer's `stake_scale`.

use stakecap_core::constants::{ADA_CIRCULATING, ADA_RESERVES, EPOCHS_PER_YEAR};
use stakecap_core::dataset::PoolDataset;
use stakecap_core::traits::CapFunction;
use stakecap_core::types::{
    EconomicParameters, ExtraPoolInput, RewardScaling, RewardsMode, SaturationMode,
};

use crate::curve::{sample_curve, Curve};
use crate::factor::reward_factor_with;
use crate::normalize::{compute_reward_scale, scale_pool};
use crate::saturation::SaturationModel;

/// Supply that stake shares are measured against.
pub fn supply_base(params: &EconomicParameters, rewards_mode: RewardsMode) -> f64 {
    match rewards_mode {
        RewardsMode::Current => ADA_CIRCULATING,
        RewardsMode::Full | RewardsMode::Max => params.total_staked(),
    }
}

/// Per-epoch monetary expansion available to pools after the treasury cut.
pub fn rewards_pot(params: &EconomicParameters) -> f64 {
    params.rho * ADA_RESERVES * (1.0 - params.tau)
}

/// Divisor applied to the pot so that pledge bonuses are not double-counted.
pub fn reward_divisor(params: &EconomicParameters, rewards_mode: RewardsMode) -> f64 {
    match rewards_mode {
        RewardsMode::Max => 1.0,
        RewardsMode::Current | RewardsMode::Full => 1.0 + params.a0,
    }
}

/// Per-epoch return to annual percentage.
pub fn annualize(roi_epoch: f64) -> f64 {
    roi_epoch * EPOCHS_PER_YEAR * 100.0
}

/// Annualized ROI percentage for a pool with `stake` and `pledge`.
///
/// `scaling` comes from [`compute_reward_scale`] for the same inputs; pass
/// [`RewardScaling::IDENTITY`] under `current` rewards.
pub fn roi_percent(
    stake: f64,
    pledge: f64,
    params: &EconomicParameters,
    max_x: f64,
    mode: SaturationMode,
    rewards_mode: RewardsMode,
    scaling: RewardScaling,
) -> f64 {
    roi_percent_with(&SaturationModel::new(mode), stake, pledge, params, max_x, rewards_mode, scaling)
}

fn roi_percent_with(
    cap: &dyn CapFunction,
    stake: f64,
    pledge: f64,
    params: &EconomicParameters,
    max_x: f64,
    rewards_mode: RewardsMode,
    scaling: RewardScaling,
) -> f64 {
    let supply = supply_base(params, rewards_mode);
    let (stake, pledge) = if rewards_mode.is_normalized() {
        scale_pool(stake, pledge, scaling.stake_scale)
    } else {
        (stake, pledge)
    };

    let f = reward_factor_with(cap, stake, pledge, params, max_x, supply);
    let reward_per_epoch =
        rewards_pot(params) / reward_divisor(params, rewards_mode) * f * scaling.reward_scale;

    if stake <= 0.0 {
        return 0.0;
    }
    annualize(reward_per_epoch / stake)
}

/// An immutable snapshot of every input the engine needs besides the pool.
///
/// Cheap to copy; build a new one whenever a parameter changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoiEngine {
    params: EconomicParameters,
    max_x: f64,
    model: SaturationModel,
    rewards: RewardsMode,
}

impl RoiEngine {
    pub fn new(
        params: EconomicParameters,
        max_x: f64,
        saturation: SaturationMode,
        rewards: RewardsMode,
    ) -> Self {
        Self {
            params,
            max_x,
            model: SaturationModel::new(saturation),
            rewards,
        }
    }

    pub fn params(&self) -> &EconomicParameters {
        &self.params
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn saturation(&self) -> SaturationMode {
        self.model.mode()
    }

    pub fn rewards(&self) -> RewardsMode {
        self.rewards
    }

    pub fn supply(&self) -> f64 {
        supply_base(&self.params, self.rewards)
    }

    pub fn cap(&self, pledge: f64) -> f64 {
        self.model.cap(pledge, &self.params, self.max_x)
    }

    /// Reward factor against this snapshot's supply base, without rescaling.
    pub fn factor(&self, stake: f64, pledge: f64) -> f64 {
        reward_factor_with(&self.model, stake, pledge, &self.params, self.max_x, self.supply())
    }

    pub fn reward_scale(&self, dataset: &PoolDataset, extra: &[ExtraPoolInput]) -> RewardScaling {
        compute_reward_scale(dataset, &self.params, self.max_x, self.model.mode(), self.rewards, extra)
    }

    pub fn roi_percent(&self, stake: f64, pledge: f64, scaling: RewardScaling) -> f64 {
        roi_percent_with(&self.model, stake, pledge, &self.params, self.max_x, self.rewards, scaling)
    }

    pub fn curve(&self, step_size_x: f64) -> Curve<SaturationModel> {
        sample_curve(self.model.mode(), &self.params, self.max_x, step_size_x)
    }
}
