//! Curve sampling for plotting a saturation cap against pledge.
//!
//! A [`Curve`] is a lazy, finite description of the samples; iterating it
//! yields [`CurvePoint`]s from `x = 0` to `x = max_x` and can be restarted any
//! number of times. Sample positions are computed as `i * step`, so long
//! curves do not accumulate floating-point drift.

use serde::{Deserialize, Serialize};
use stakecap_core::constants::EXPONENTIAL_OVERSAMPLE;
use stakecap_core::traits::CapFunction;
use stakecap_core::types::{EconomicParameters, SaturationMode};

use crate::saturation::SaturationModel;

/// Slack when deciding whether the last step still lands inside the range.
const STEP_EPSILON: f64 = 1e-9;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

/// Sampling step for `mode`: exponential curves are sampled 8× denser.
pub fn sample_step(mode: SaturationMode, step_size_x: f64) -> f64 {
    match mode {
        SaturationMode::Exponential => step_size_x / EXPONENTIAL_OVERSAMPLE,
        _ => step_size_x,
    }
}

/// Samples of the cap for `mode` over `[0, max_x]`.
pub fn sample_curve(
    mode: SaturationMode,
    params: &EconomicParameters,
    max_x: f64,
    step_size_x: f64,
) -> Curve<SaturationModel> {
    Curve::new(SaturationModel::new(mode), *params, max_x, sample_step(mode, step_size_x))
}

/// Samples of a cap function over `[0, max_x]` at a fixed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve<C> {
    cap: C,
    params: EconomicParameters,
    max_x: f64,
    step: f64,
}

impl<C: CapFunction> Curve<C> {
    pub fn new(cap: C, params: EconomicParameters, max_x: f64, step: f64) -> Self {
        Self { cap, params, max_x, step }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    /// Number of samples.
    ///
    /// Zero for a non-positive or non-finite step, a negative or non-finite
    /// range, or a range holding more steps than `usize` can count.
    pub fn len(&self) -> usize {
        let valid_step = self.step.is_finite() && self.step > 0.0;
        let valid_range = self.max_x.is_finite() && self.max_x >= 0.0;
        if !valid_step || !valid_range {
            return 0;
        }
        let steps = (self.max_x / self.step + STEP_EPSILON).floor();
        if !steps.is_finite() || steps >= usize::MAX as f64 {
            return 0;
        }
        (steps as usize).saturating_add(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cap at pledge `x`, evaluated with this curve's viewport.
    pub fn value_at(&self, x: f64) -> f64 {
        self.cap.cap(x, &self.params, self.max_x)
    }

    pub fn iter(&self) -> CurvePoints<'_, C> {
        CurvePoints {
            curve: self,
            next: 0,
            len: self.len(),
        }
    }
}

impl<'a, C: CapFunction> IntoIterator for &'a Curve<C> {
    type Item = CurvePoint;
    type IntoIter = CurvePoints<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the samples of a [`Curve`].
#[derive(Debug, Clone)]
pub struct CurvePoints<'a, C> {
    curve: &'a Curve<C>,
    next: usize,
    len: usize,
}

impl<C: CapFunction> Iterator for CurvePoints<'_, C> {
    type Item = CurvePoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let x = (self.next as f64 * self.curve.step).min(self.curve.max_x);
        self.next += 1;
        Some(CurvePoint {
            x,
            y: self.curve.value_at(x),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl<C: CapFunction> ExactSizeIterator for CurvePoints<'_, C> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::saturation::base_cap;
    use proptest::prelude::*;

    fn params_l(l: f64) -> EconomicParameters {
        EconomicParameters { l, ..Default::default() }
    }

    #[test]
    fn linear_curve_steps_and_values() {
        let p = params_l(0.5);
        let curve = sample_curve(SaturationMode::Linear, &p, 75_000_000.0, 5_000_000.0);
        let points: Vec<CurvePoint> = curve.iter().collect();
        assert_eq!(points.len(), 16);
        assert_eq!(points[0].x, 0.0);
        assert_eq!(points[0].y, base_cap(&p));
        assert_eq!(points[15].x, 75_000_000.0);
        assert_eq!(points[1].y, base_cap(&p) + 0.5 * 5_000_000.0);
    }

    #[test]
    fn exponential_curve_is_oversampled() {
        let p = params_l(1.0);
        let curve = sample_curve(SaturationMode::Exponential, &p, 75_000_000.0, 5_000_000.0);
        assert_eq!(curve.step(), 625_000.0);
        assert_eq!(curve.len(), 121);
        let last = curve.iter().last().unwrap();
        assert_eq!(last.x, 75_000_000.0);
    }

    #[test]
    fn range_not_multiple_of_step_stops_below_max() {
        let curve = sample_curve(SaturationMode::Current, &params_l(0.0), 10.0, 3.0);
        let xs: Vec<f64> = curve.iter().map(|p| p.x).collect();
        assert_eq!(xs, [0.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn curve_is_restartable() {
        let curve = sample_curve(SaturationMode::Cip50, &params_l(2.0), 1_000_000.0, 100_000.0);
        let first: Vec<CurvePoint> = curve.iter().collect();
        let second: Vec<CurvePoint> = (&curve).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn degenerate_step_yields_nothing() {
        let p = params_l(0.0);
        assert!(sample_curve(SaturationMode::Linear, &p, 100.0, 0.0).is_empty());
        assert!(sample_curve(SaturationMode::Linear, &p, 100.0, -1.0).is_empty());
        assert!(sample_curve(SaturationMode::Linear, &p, 100.0, f64::NAN).is_empty());
        assert!(sample_curve(SaturationMode::Linear, &p, -5.0, 1.0).is_empty());
    }

    #[test]
    fn uncountable_range_yields_nothing() {
        let p = EconomicParameters::default();
        assert!(sample_curve(SaturationMode::Linear, &p, 1e300, 1e-300).is_empty());
        assert!(sample_curve(SaturationMode::Linear, &p, f64::MAX, f64::MIN_POSITIVE).is_empty());
        assert_eq!(sample_curve(SaturationMode::Linear, &p, 1e300, 1e-300).iter().count(), 0);
        // Large but countable ranges still report their length.
        assert_eq!(sample_curve(SaturationMode::Current, &p, 1e20, 1e8).len(), 1_000_000_000_001);
    }

    #[test]
    fn zero_range_yields_origin_only() {
        let curve = sample_curve(SaturationMode::Linear, &params_l(1.0), 0.0, 10.0);
        assert_eq!(curve.len(), 1);
        assert_eq!(curve.iter().next().unwrap().x, 0.0);
    }

    #[test]
    fn exact_size_matches_count() {
        let curve = sample_curve(SaturationMode::Exponential, &params_l(1.0), 5_000_000.0, 500_000.0);
        let iter = curve.iter();
        assert_eq!(iter.len(), curve.len());
        assert_eq!(iter.count(), 81);
    }

    // --- proptest ---

    proptest! {
        #[test]
        fn samples_stay_in_range_and_ascend(
            max_x in 1.0f64..1e9,
            steps in 1u32..500,
        ) {
            let step = max_x / steps as f64;
            let curve = sample_curve(SaturationMode::Linear, &params_l(0.1), max_x, step);
            let xs: Vec<f64> = curve.iter().map(|p| p.x).collect();
            prop_assert!(!xs.is_empty());
            prop_assert_eq!(xs[0], 0.0);
            for w in xs.windows(2) {
                prop_assert!(w[0] < w[1]);
            }
            prop_assert!(*xs.last().unwrap() <= max_x);
        }
    }
}
