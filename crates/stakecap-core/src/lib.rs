//! # stakecap-core
//! Foundation types, supply constants, and the pool dataset for Stakecap.

pub mod constants;
pub mod dataset;
pub mod error;
pub mod traits;
pub mod types;
