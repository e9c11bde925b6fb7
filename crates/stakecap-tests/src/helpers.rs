//! Shared builders for scenario and property tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use stakecap_core::dataset::{PoolDataset, PoolRecord};
use stakecap_core::types::{EconomicParameters, PoolGroup};

/// Viewport used by the reference scenarios.
pub const MAX_X: f64 = 75_000_000.0;

/// Parameters of the reference scenarios: `k = 500, a0 = 0.3, L = 0`,
/// `L2 = 1, rho = 0.003, tau = 0.2`.
pub fn reference_params() -> EconomicParameters {
    EconomicParameters::default()
}

/// A pool record with a deterministic bech32-looking id.
pub fn record(index: usize, stake: f64, pledge: f64, group: PoolGroup) -> PoolRecord {
    PoolRecord {
        pool_id_bech32: format!("pool1test{index:08}"),
        ticker: Some(format!("T{index}")),
        pledge,
        active_stake: stake,
        group,
    }
}

/// Dataset from `(stake, pledge)` pairs, alternating operator groups.
pub fn dataset(pools: &[(f64, f64)]) -> PoolDataset {
    PoolDataset::from_records(pools.iter().enumerate().map(|(i, &(stake, pledge))| {
        let group = if i % 2 == 0 {
            PoolGroup::SingleOperator
        } else {
            PoolGroup::MultiOperator
        };
        record(i, stake, pledge, group)
    }))
}

/// A reproducible synthetic pool universe.
///
/// Stakes are spread from dust to well past saturation, pledges from zero to
/// the full stake; roughly one pool in ten has zero stake and is dropped on
/// load.
pub fn synthetic_universe(seed: u64, pools: usize) -> PoolDataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let records: Vec<PoolRecord> = (0..pools)
        .map(|i| {
            let stake = if rng.gen_bool(0.1) {
                0.0
            } else {
                10f64.powf(rng.gen_range(2.0..8.5))
            };
            let pledge = stake * rng.gen_range(0.0..=1.0);
            let group = if rng.gen_bool(0.3) {
                PoolGroup::MultiOperator
            } else {
                PoolGroup::SingleOperator
            };
            record(i, stake, pledge, group)
        })
        .collect();
    PoolDataset::from_records(records)
}

/// Relative closeness, for values of any magnitude.
pub fn approx_eq(a: f64, b: f64, rel: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= rel * a.abs().max(b.abs())
}
