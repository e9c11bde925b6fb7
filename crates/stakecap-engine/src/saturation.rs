//! Saturation-cap models implementing the [`CapFunction`] trait.
//!
//! Every model starts from the base cap `circulating / k`:
//! - `current`: the base cap, independent of pledge.
//! - `linear`: base cap plus `L * pledge`.
//! - `exponential`: base cap plus `F * L * (1 - e^(-pledge / tau))`, with the
//!   time constant `tau = (L2 / 100) * max_x` tracking the viewport.
//! - `cip-50`: `min(max(L, 0.1) * pledge, base cap)`.
//! - `cip-7`: the base cap; pledge effectiveness becomes sub-linear instead.

use stakecap_core::constants::{ADA_CIRCULATING, CIP50_MIN_SLOPE, EXPONENTIAL_CAP_SCALE};
use stakecap_core::traits::CapFunction;
use stakecap_core::types::{EconomicParameters, SaturationMode};

/// The `current` cap: circulating supply split evenly across `k` pools.
pub fn base_cap(params: &EconomicParameters) -> f64 {
    ADA_CIRCULATING / params.k
}

/// Absolute saturation cap for `pledge` under `mode`.
pub fn cap(mode: SaturationMode, pledge: f64, params: &EconomicParameters, max_x: f64) -> f64 {
    SaturationModel::new(mode).cap(pledge, params, max_x)
}

/// The production cap policy, dispatched on [`SaturationMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SaturationModel {
    mode: SaturationMode,
}

impl SaturationModel {
    pub fn new(mode: SaturationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> SaturationMode {
        self.mode
    }

    /// Supremum of the cap over all non-negative pledges.
    ///
    /// Returns `None` when the cap grows without bound (`linear` with `L > 0`).
    pub fn ceiling(&self, params: &EconomicParameters) -> Option<f64> {
        let base = base_cap(params);
        match self.mode {
            SaturationMode::Current | SaturationMode::Cip7 | SaturationMode::Cip50 => Some(base),
            SaturationMode::Linear if params.l > 0.0 => None,
            SaturationMode::Linear => Some(base),
            SaturationMode::Exponential => Some(base + EXPONENTIAL_CAP_SCALE * params.l.max(0.0)),
        }
    }
}

impl From<SaturationMode> for SaturationModel {
    fn from(mode: SaturationMode) -> Self {
        Self::new(mode)
    }
}

impl CapFunction for SaturationModel {
    fn cap(&self, pledge: f64, params: &EconomicParameters, max_x: f64) -> f64 {
        let base = base_cap(params);
        match self.mode {
            SaturationMode::Current | SaturationMode::Cip7 => base,
            SaturationMode::Linear => base + params.l * pledge,
            SaturationMode::Exponential => {
                let tau = (params.l2 / 100.0) * max_x;
                base + EXPONENTIAL_CAP_SCALE * params.l * (1.0 - (-pledge / tau).exp())
            }
            SaturationMode::Cip50 => (params.l.max(CIP50_MIN_SLOPE) * pledge).min(base),
        }
    }

    fn effective_pledge(&self, pledge: f64, params: &EconomicParameters, supply: f64) -> f64 {
        match self.mode {
            SaturationMode::Cip7 => {
                // Pledge below the crossover counts for more than its face value,
                // pledge above it for less.
                let root = params.curve_root;
                let crossover = supply / (params.k * params.crossover);
                pledge.powf(1.0 / root) * crossover.powf((root - 1.0) / root) / supply
            }
            _ => pledge / supply,
        }
    }
}
