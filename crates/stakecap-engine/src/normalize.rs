//! Reward normalization under `full` and `max` rewards.
//!
//! Both regimes assume the network stakes `circulating * staked_ratio` rather
//! than what the dataset observes. The whole pool universe (dataset plus any
//! hypothetical pools) is stretched by one `stake_scale` so its total matches
//! that supply, and `reward_scale` then corrects the summed reward factors of
//! the stretched universe back to exactly one.

use tracing::debug;

use stakecap_core::dataset::PoolDataset;
use stakecap_core::types::{
    EconomicParameters, ExtraPoolInput, RewardScaling, RewardsMode, SaturationMode,
};

use crate::factor::reward_factor_with;
use crate::roi::supply_base;
use crate::saturation::SaturationModel;

/// Scale a pool's stake and pledge, keeping pledge at or below stake.
pub fn scale_pool(stake: f64, pledge: f64, stake_scale: f64) -> (f64, f64) {
    let stake = stake * stake_scale;
    let pledge = (pledge * stake_scale).min(stake);
    (stake, pledge)
}

/// Derive the global [`RewardScaling`] for a pool universe.
///
/// Returns [`RewardScaling::IDENTITY`] under `current` rewards, for a
/// non-positive supply, and when the universe holds no stake. Extra pools
/// without a finite positive stake are ignored.
pub fn compute_reward_scale(
    dataset: &PoolDataset,
    params: &EconomicParameters,
    max_x: f64,
    mode: SaturationMode,
    rewards_mode: RewardsMode,
    extra: &[ExtraPoolInput],
) -> RewardScaling {
    if !rewards_mode.is_normalized() {
        return RewardScaling::IDENTITY;
    }

    let supply = supply_base(params, rewards_mode);
    if supply <= 0.0 {
        debug!(supply, "non-positive supply, skipping normalization");
        return RewardScaling::IDENTITY;
    }

    let valid_extra = || extra.iter().filter(|p| p.is_valid());
    let raw_total = dataset.total_active_stake() + valid_extra().map(|p| p.stake).sum::<f64>();
    if raw_total.is_nan() || raw_total <= 0.0 {
        debug!(raw_total, "empty pool universe, skipping normalization");
        return RewardScaling::IDENTITY;
    }

    let stake_scale = supply / raw_total;
    let model = SaturationModel::new(mode);
    let factor = |stake: f64, pledge: f64| {
        let (stake, pledge) = scale_pool(stake, pledge, stake_scale);
        reward_factor_with(&model, stake, pledge, params, max_x, supply)
    };

    let dataset_sum: f64 = dataset.iter().map(|p| factor(p.active_stake, p.pledge)).sum();
    let extra_sum: f64 = valid_extra().map(|p| factor(p.stake, p.pledge.max(0.0))).sum();
    let factor_sum = dataset_sum + extra_sum;

    let reward_scale = if factor_sum > 0.0 { 1.0 / factor_sum } else { 1.0 };

    debug!(
        %mode,
        %rewards_mode,
        pools = dataset.len(),
        extra = valid_extra().count(),
        raw_total,
        supply,
        stake_scale,
        factor_sum,
        reward_scale,
        "reward scale computed"
    );

    RewardScaling {
        reward_scale,
        stake_scale,
    }
}
