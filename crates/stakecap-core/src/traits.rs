//! Trait interfaces between Stakecap crates.
//!
//! - [`CapFunction`]: saturation cap and effective pledge, implemented in stakecap-engine

use crate::types::EconomicParameters;

/// A saturation-cap policy.
///
/// Maps a pool's pledge to the absolute stake level (in ADA) beyond which the
/// pool's rewards stop growing, and defines how much of the pledge counts
/// towards the pledge bonus. Implemented by `SaturationModel` in
/// stakecap-engine; reward-factor and curve code accept `&dyn CapFunction`
/// so alternative policies can be plugged in.
pub trait CapFunction: Send + Sync {
    /// Absolute saturation cap for a pool pledging `pledge` ADA.
    ///
    /// `max_x` is the upper bound of the plotting viewport; only caps whose
    /// shape tracks the visible range depend on it.
    fn cap(&self, pledge: f64, params: &EconomicParameters, max_x: f64) -> f64;

    /// Effective relative pledge `s` used by the reward-sharing formula.
    ///
    /// Default implementation: `pledge / supply`.
    fn effective_pledge(&self, pledge: f64, _params: &EconomicParameters, supply: f64) -> f64 {
        pledge / supply
    }
}
