//! # stakecap-engine
//! Saturation-cap and reward-sharing engine.
//!
//! All functions are pure: every input is passed explicitly and nothing is
//! cached between calls, so callers may recompute on every parameter change.
//!
//! - **Saturation models**: five cap policies (`current`, `linear`,
//!   `exponential`, `cip-50`, `cip-7`) mapping pledge to an absolute cap.
//! - **Curve sampling**: lazy, restartable `(x, y)` samples of a cap over a
//!   plotting range.
//! - **Reward factor**: the `a0` pledge-bonus reward-sharing formula with
//!   stake and pledge clamped at saturation.
//! - **Reward normalization**: rescales the whole pool universe to an assumed
//!   staked supply and derives the correction that makes reward factors sum
//!   to one.
//! - **ROI**: annualized return for a single pool under a rewards regime.

pub mod curve;
pub mod factor;
pub mod normalize;
pub mod rank;
pub mod roi;
pub mod saturation;

pub use curve::{sample_curve, Curve, CurvePoint};
pub use factor::{reward_factor, reward_factor_with, FactorTerms};
pub use normalize::{compute_reward_scale, scale_pool};
pub use rank::{rank_pools, PoolRoi};
pub use roi::{roi_percent, RoiEngine};
pub use saturation::{cap, SaturationModel};
