//! Integration test suite for Stakecap.
//!
//! Reference scenarios with hand-checked numbers, and property tests that
//! run the whole pipeline (dataset load, normalization, ROI) over synthetic
//! pool universes.

pub mod helpers;
