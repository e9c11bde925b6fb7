//! Core model types: economic parameters, modes, pools, and scaling factors.
//!
//! All stake and pledge amounts are in whole ADA as `f64`. The engine is a
//! model, not a ledger, so non-finite results from out-of-range parameters are
//! surfaced to the caller as-is.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    ADA_CIRCULATING, CUSTOM_POOL_DEFAULT_PLEDGE, CUSTOM_POOL_DEFAULT_STAKE, GRAPH_X_DEFAULT_MAX,
    GRAPH_X_DEFAULT_STEP, GRAPH_X_ZOOM_1X_MAX, GRAPH_X_ZOOM_1X_STEP, GRAPH_X_ZOOM_2X_MAX,
    GRAPH_X_ZOOM_2X_STEP, GRAPH_X_ZOOM_OFF_MAX, GRAPH_X_ZOOM_OFF_STEP,
};
use crate::error::ParamsError;

/// Saturation-cap policy.
///
/// Selects both the cap function and the pledge-effectiveness transform.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SaturationMode {
    /// Fixed cap `circulating / k`.
    #[default]
    #[serde(rename = "current")]
    Current,
    /// Cap grows linearly with pledge.
    #[serde(rename = "linear")]
    Linear,
    /// Cap grows with pledge and saturates exponentially.
    #[serde(rename = "exponential")]
    Exponential,
    /// Pledge-proportional cap bounded by the current cap.
    #[serde(rename = "cip-50")]
    Cip50,
    /// Current cap with a sub-linear effective pledge.
    #[serde(rename = "cip-7")]
    Cip7,
}

impl SaturationMode {
    pub const ALL: [SaturationMode; 5] = [
        SaturationMode::Current,
        SaturationMode::Linear,
        SaturationMode::Exponential,
        SaturationMode::Cip50,
        SaturationMode::Cip7,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Linear => "linear",
            Self::Exponential => "exponential",
            Self::Cip50 => "cip-50",
            Self::Cip7 => "cip-7",
        }
    }
}

impl fmt::Display for SaturationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaturationMode {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParamsError::UnknownSaturationMode(s.to_string()))
    }
}

/// Reward distribution regime.
///
/// `Current` uses the circulating supply as the stake base. `Full` and `Max`
/// assume the staked supply (`circulating * staked_ratio`) and trigger reward
/// normalization; `Max` additionally pays the pledge bonus without the
/// `1 + a0` divisor.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum RewardsMode {
    #[default]
    Current,
    Full,
    Max,
}

impl RewardsMode {
    pub const ALL: [RewardsMode; 3] = [RewardsMode::Current, RewardsMode::Full, RewardsMode::Max];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Full => "full",
            Self::Max => "max",
        }
    }

    /// Whether this mode rescales the pool universe before computing rewards.
    pub fn is_normalized(&self) -> bool {
        !matches!(self, Self::Current)
    }
}

impl fmt::Display for RewardsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewardsMode {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParamsError::UnknownRewardsMode(s.to_string()))
    }
}

/// Viewport zoom presets for the pledge axis.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum ZoomLevel {
    #[default]
    Off,
    Zoom,
    SuperZoom,
}

impl ZoomLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Zoom => "zoom",
            Self::SuperZoom => "superZoom",
        }
    }
}

impl FromStr for ZoomLevel {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("super-zoom") {
            return Ok(Self::SuperZoom);
        }
        [Self::Off, Self::Zoom, Self::SuperZoom]
            .into_iter()
            .find(|z| z.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParamsError::UnknownZoomLevel(s.to_string()))
    }
}

/// Tunable protocol and economic parameters.
///
/// An immutable snapshot passed into every calculation; the engine never
/// retains or mutates it between calls.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct EconomicParameters {
    /// Target number of saturated pools.
    pub k: f64,
    /// Pledge influence.
    pub a0: f64,
    /// Pledge slope for the linear, exponential and CIP-50 caps.
    #[serde(alias = "L")]
    pub l: f64,
    /// Exponential knee, as a percentage of the viewport's pledge range.
    #[serde(alias = "L2")]
    pub l2: f64,
    /// CIP-7 crossover factor.
    pub crossover: f64,
    /// CIP-7 curve root.
    #[serde(alias = "curveRoot")]
    pub curve_root: f64,
    /// Monetary expansion per epoch.
    pub rho: f64,
    /// Treasury cut.
    pub tau: f64,
    /// Fraction of circulating ADA assumed staked under `full`/`max` rewards.
    #[serde(alias = "stakedRatio")]
    pub staked_ratio: f64,
}

impl Default for EconomicParameters {
    fn default() -> Self {
        Self {
            k: 500.0,
            a0: 0.3,
            l: 0.0,
            l2: 1.0,
            crossover: 8.0,
            curve_root: 3.0,
            rho: 0.003,
            tau: 0.2,
            staked_ratio: 0.6,
        }
    }
}

impl EconomicParameters {
    /// Total ADA staked under the `full`/`max` participation assumption.
    ///
    /// # Examples
    ///
    /// ```
    /// use stakecap_core::constants::ADA_CIRCULATING;
    /// use stakecap_core::types::EconomicParameters;
    /// let params = EconomicParameters { staked_ratio: 0.5, ..Default::default() };
    /// assert_eq!(params.total_staked(), ADA_CIRCULATING * 0.5);
    /// ```
    pub fn total_staked(&self) -> f64 {
        ADA_CIRCULATING * self.staked_ratio
    }

    /// Check the bounds a parameter UI would enforce.
    ///
    /// The engine itself never validates; this is for callers that accept
    /// parameters from untrusted sources (config files, environment).
    pub fn validate(&self) -> Result<(), ParamsError> {
        check("k", self.k, self.k > 0.0, "> 0")?;
        check("a0", self.a0, self.a0 >= 0.0, ">= 0")?;
        check("L", self.l, self.l >= 0.0, ">= 0")?;
        check("L2", self.l2, self.l2 > 0.0, "> 0")?;
        check("crossover", self.crossover, self.crossover > 0.0, "> 0")?;
        check("curve_root", self.curve_root, self.curve_root >= 1.0, ">= 1")?;
        check("rho", self.rho, (0.0..=1.0).contains(&self.rho), "in [0, 1]")?;
        check("tau", self.tau, (0.0..=1.0).contains(&self.tau), "in [0, 1]")?;
        check(
            "staked_ratio",
            self.staked_ratio,
            self.staked_ratio > 0.0 && self.staked_ratio <= 1.0,
            "in (0, 1]",
        )
    }
}

fn check(name: &'static str, value: f64, ok: bool, expected: &'static str) -> Result<(), ParamsError> {
    // NaN fails every comparison above, so `ok` is false for it too.
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(ParamsError::OutOfRange { name, value, expected })
    }
}

/// Plotting viewport for the pledge axis.
///
/// `max_x` also feeds the exponential cap's time constant.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct GraphSettings {
    #[serde(alias = "maxX")]
    pub max_x: f64,
    #[serde(alias = "stepSizeX")]
    pub step_size_x: f64,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            max_x: GRAPH_X_DEFAULT_MAX,
            step_size_x: GRAPH_X_DEFAULT_STEP,
        }
    }
}

impl GraphSettings {
    /// Viewport preset for a zoom level.
    pub fn from_zoom(zoom: ZoomLevel) -> Self {
        match zoom {
            ZoomLevel::Off => Self {
                max_x: GRAPH_X_ZOOM_OFF_MAX,
                step_size_x: GRAPH_X_ZOOM_OFF_STEP,
            },
            ZoomLevel::Zoom => Self {
                max_x: GRAPH_X_ZOOM_1X_MAX,
                step_size_x: GRAPH_X_ZOOM_1X_STEP,
            },
            ZoomLevel::SuperZoom => Self {
                max_x: GRAPH_X_ZOOM_2X_MAX,
                step_size_x: GRAPH_X_ZOOM_2X_STEP,
            },
        }
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        check("max_x", self.max_x, self.max_x > 0.0, "> 0")?;
        check("step_size_x", self.step_size_x, self.step_size_x > 0.0, "> 0")
    }
}

/// A hypothetical pool injected into reward normalization.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct ExtraPoolInput {
    pub stake: f64,
    pub pledge: f64,
}

impl ExtraPoolInput {
    /// The custom pool a user starts from before dragging it around.
    pub const CUSTOM_DEFAULT: Self = Self {
        stake: CUSTOM_POOL_DEFAULT_STAKE,
        pledge: CUSTOM_POOL_DEFAULT_PLEDGE,
    };

    pub fn new(stake: f64, pledge: f64) -> Self {
        Self { stake, pledge }
    }

    /// Only pools with a finite, positive stake take part in normalization.
    pub fn is_valid(&self) -> bool {
        self.stake.is_finite() && self.stake > 0.0
    }

    /// Stake cannot be lower than pledge.
    pub fn pledge_exceeds_stake(&self) -> bool {
        self.pledge > self.stake
    }

    /// The same pool with pledge lowered to its stake.
    pub fn clamped(self) -> Self {
        Self {
            stake: self.stake,
            pledge: self.pledge.min(self.stake),
        }
    }
}

/// Global correction factors produced by reward normalization.
///
/// `stake_scale` maps observed stake onto the assumed staked supply;
/// `reward_scale` makes the reward factors of the scaled universe sum to one.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct RewardScaling {
    #[serde(alias = "rewardScale")]
    pub reward_scale: f64,
    #[serde(alias = "stakeScale")]
    pub stake_scale: f64,
}

impl RewardScaling {
    pub const IDENTITY: Self = Self {
        reward_scale: 1.0,
        stake_scale: 1.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for RewardScaling {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Operator classification of a pool.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum PoolGroup {
    /// Single-pool operator.
    #[default]
    #[serde(rename = "sSPO")]
    SingleOperator,
    /// Multi-pool operator.
    #[serde(rename = "MPO")]
    MultiOperator,
    #[serde(rename = "other", other)]
    Other,
}

impl PoolGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleOperator => "sSPO",
            Self::MultiOperator => "MPO",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PoolGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stake pool after load-time normalization.
///
/// Invariant: `pledge <= active_stake` and `active_stake > 0`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Pool {
    pub id: String,
    pub ticker: String,
    pub pledge: f64,
    pub active_stake: f64,
    pub group: PoolGroup,
}
