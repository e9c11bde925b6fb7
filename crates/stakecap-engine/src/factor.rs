//! Per-pool reward-sharing factor.
//!
//! With stake share `sigma`, effective pledge share `s` and relative
//! saturation cap `z0`:
//!
//! ```text
//! sigma' = min(sigma, z0)
//! s'     = min(s, z0)
//! inner  = sigma' - s' * (z0 - sigma') / z0
//! f      = sigma' + s' * a0 * inner / z0
//! ```
//!
//! A pool earns its stake share plus a pledge bonus scaled by `a0`; both are
//! capped at saturation and the bonus shrinks as the pool moves away from
//! saturation. Degenerate inputs (no stake, no supply, no cap) give `0`, and
//! the factor is floored at `0`.

use stakecap_core::traits::CapFunction;
use stakecap_core::types::{EconomicParameters, SaturationMode};

use crate::saturation::SaturationModel;

/// Intermediate terms of the reward-sharing formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorTerms {
    /// Stake share.
    pub sigma: f64,
    /// Effective pledge share.
    pub s: f64,
    /// Relative saturation cap.
    pub z0: f64,
    pub sigma_capped: f64,
    pub s_capped: f64,
    pub inner: f64,
    pub factor: f64,
}

impl FactorTerms {
    /// Evaluate the formula. Returns `None` for degenerate inputs.
    pub fn compute(
        cap: &dyn CapFunction,
        stake: f64,
        pledge: f64,
        params: &EconomicParameters,
        max_x: f64,
        supply: f64,
    ) -> Option<Self> {
        if stake <= 0.0 || supply <= 0.0 {
            return None;
        }
        let sigma = stake / supply;
        let s = cap.effective_pledge(pledge, params, supply);
        let z0 = cap.cap(pledge, params, max_x) / supply;
        if z0 <= 0.0 {
            return None;
        }

        let sigma_capped = sigma.min(z0);
        let s_capped = s.min(z0);
        let inner = sigma_capped - s_capped * (z0 - sigma_capped) / z0;
        let raw = sigma_capped + s_capped * params.a0 * (inner / z0);
        // A strongly boosted CIP-7 pledge on a tiny pool drives `inner` below
        // zero; rewards never go negative. NaN passes through.
        let factor = if raw < 0.0 { 0.0 } else { raw };

        Some(Self {
            sigma,
            s,
            z0,
            sigma_capped,
            s_capped,
            inner,
            factor,
        })
    }
}

/// Reward factor for one pool under the production cap for `mode`.
pub fn reward_factor(
    stake: f64,
    pledge: f64,
    params: &EconomicParameters,
    max_x: f64,
    mode: SaturationMode,
    supply: f64,
) -> f64 {
    reward_factor_with(&SaturationModel::new(mode), stake, pledge, params, max_x, supply)
}

/// Reward factor for one pool under an arbitrary cap function.
pub fn reward_factor_with(
    cap: &dyn CapFunction,
    stake: f64,
    pledge: f64,
    params: &EconomicParameters,
    max_x: f64,
    supply: f64,
) -> f64 {
    FactorTerms::compute(cap, stake, pledge, params, max_x, supply).map_or(0.0, |t| t.factor)
}
