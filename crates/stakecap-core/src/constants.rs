//! Network constants. All monetary values are in whole ADA.

use serde::Serialize;

pub const ADA_TOTAL_SUPPLY: f64 = 45_000_000_000.0;
pub const ADA_RESERVES: f64 = 7_251_344_361.0;
pub const ADA_CIRCULATING: f64 = ADA_TOTAL_SUPPLY - ADA_RESERVES;
pub const ADA_TREASURY: f64 = 1_730_343_069.0;

/// Epochs per year (five-day epochs).
pub const EPOCHS_PER_YEAR: f64 = 73.0;

/// Scale applied to the exponential pledge bump so that `L` maps onto stake units.
pub const EXPONENTIAL_CAP_SCALE: f64 = 10_000_000.0;

/// Minimum pledge slope under CIP-50.
pub const CIP50_MIN_SLOPE: f64 = 0.1;

/// Exponential curves are sampled this many times more densely than linear ones.
pub const EXPONENTIAL_OVERSAMPLE: f64 = 8.0;

pub const GRAPH_X_DEFAULT_MAX: f64 = 75_000_000.0;
pub const GRAPH_X_DEFAULT_STEP: f64 = 5_000_000.0;
pub const GRAPH_X_ZOOM_OFF_MAX: f64 = 50_000_000.0;
pub const GRAPH_X_ZOOM_OFF_STEP: f64 = 5_000_000.0;
pub const GRAPH_X_ZOOM_1X_MAX: f64 = 5_000_000.0;
pub const GRAPH_X_ZOOM_1X_STEP: f64 = 500_000.0;
pub const GRAPH_X_ZOOM_2X_MAX: f64 = 1_000_000.0;
pub const GRAPH_X_ZOOM_2X_STEP: f64 = 100_000.0;

pub const CUSTOM_POOL_DEFAULT_PLEDGE: f64 = 40_000_000.0;
pub const CUSTOM_POOL_DEFAULT_STAKE: f64 = 40_000_000.0;

/// Fixed supply snapshot of the network, mirroring the `ADA_*` constants.
///
/// # Examples
///
/// ```
/// use stakecap_core::constants::{SupplyConstants, ADA_CIRCULATING};
/// let supply = SupplyConstants::MAINNET;
/// assert_eq!(supply.circulating(), ADA_CIRCULATING);
/// assert_eq!(supply.circulating(), 37_748_655_639.0);
/// ```
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct SupplyConstants {
    /// Maximum ADA supply.
    pub total_supply: f64,
    /// ADA still held in the reserve, funding monetary expansion.
    pub reserves: f64,
    /// ADA held by the treasury.
    pub treasury: f64,
}

impl SupplyConstants {
    /// The mainnet supply snapshot the reward model is calibrated against.
    pub const MAINNET: Self = Self {
        total_supply: ADA_TOTAL_SUPPLY,
        reserves: ADA_RESERVES,
        treasury: ADA_TREASURY,
    };

    /// ADA in circulation: total supply minus reserves.
    pub fn circulating(&self) -> f64 {
        self.total_supply - self.reserves
    }
}

impl Default for SupplyConstants {
    fn default() -> Self {
        Self::MAINNET
    }
}
