//! Dataset-wide ROI ranking.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::Serialize;

use stakecap_core::dataset::PoolDataset;
use stakecap_core::types::{PoolGroup, RewardScaling};

use crate::roi::RoiEngine;

/// One pool's annualized ROI, with the pool's observed stake and pledge.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PoolRoi {
    pub id: String,
    pub ticker: String,
    pub group: PoolGroup,
    pub stake: f64,
    pub pledge: f64,
    pub roi: f64,
}

/// ROI of every pool in `dataset`, best first.
///
/// Ties are broken by larger stake. NaN sorts above every number, so a
/// degenerate parameter set shows up at the top rather than hiding.
pub fn rank_pools(dataset: &PoolDataset, engine: &RoiEngine, scaling: RewardScaling) -> Vec<PoolRoi> {
    let mut ranked: Vec<PoolRoi> = dataset
        .iter()
        .map(|pool| PoolRoi {
            id: pool.id.clone(),
            ticker: pool.ticker.clone(),
            group: pool.group.clone(),
            stake: pool.active_stake,
            pledge: pool.pledge,
            roi: engine.roi_percent(pool.active_stake, pool.pledge, scaling),
        })
        .collect();
    ranked.sort_by_key(|r| (Reverse(OrderedFloat(r.roi)), Reverse(OrderedFloat(r.stake))));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakecap_core::dataset::PoolRecord;
    use stakecap_core::types::{EconomicParameters, RewardsMode, SaturationMode};

    fn record(id: &str, ticker: Option<&str>, stake: f64, pledge: f64) -> PoolRecord {
        PoolRecord {
            pool_id_bech32: id.to_string(),
            ticker: ticker.map(str::to_string),
            pledge,
            active_stake: stake,
            group: PoolGroup::MultiOperator,
        }
    }

    fn engine(rewards: RewardsMode) -> RoiEngine {
        RoiEngine::new(EconomicParameters::default(), 75_000_000.0, SaturationMode::Current, rewards)
    }

    #[test]
    fn pledge_ranks_higher() {
        let ds = PoolDataset::from_records([
            record("pool1aaaa", Some("LOW"), 20_000_000.0, 0.0),
            record("pool1bbbb", Some("HIGH"), 20_000_000.0, 5_000_000.0),
            record("pool1cccc", None, 20_000_000.0, 1_000_000.0),
        ]);
        let ranked = rank_pools(&ds, &engine(RewardsMode::Current), RewardScaling::IDENTITY);
        let tickers: Vec<&str> = ranked.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, ["HIGH", "privatecccc", "LOW"]);
        assert!(ranked.windows(2).all(|w| w[0].roi >= w[1].roi));
    }

    #[test]
    fn oversaturated_pool_ranks_last() {
        let ds = PoolDataset::from_records([
            record("pool1sat", Some("SAT"), 300_000_000.0, 1_000_000.0),
            record("pool1ok", Some("OK"), 50_000_000.0, 1_000_000.0),
        ]);
        let ranked = rank_pools(&ds, &engine(RewardsMode::Current), RewardScaling::IDENTITY);
        assert_eq!(ranked[0].ticker, "OK");
        assert_eq!(ranked[1].ticker, "SAT");
    }

    #[test]
    fn ties_break_on_stake() {
        // No pledge and a0 = 0: every unsaturated pool earns the same ROI.
        let params = EconomicParameters { a0: 0.0, ..Default::default() };
        let engine = RoiEngine::new(params, 75_000_000.0, SaturationMode::Current, RewardsMode::Current);
        let ds = PoolDataset::from_records([
            record("pool1small", Some("S"), 1_000_000.0, 0.0),
            record("pool1big", Some("B"), 4_000_000.0, 0.0),
        ]);
        let ranked = rank_pools(&ds, &engine, RewardScaling::IDENTITY);
        assert!((ranked[0].roi - ranked[1].roi).abs() < 1e-9);
        assert_eq!(ranked[0].ticker, "B");
    }

    #[test]
    fn ranking_reports_observed_stake() {
        let ds = PoolDataset::from_records([record("pool1x", Some("X"), 10_000_000.0, 20_000_000.0)]);
        let e = engine(RewardsMode::Full);
        let scaling = e.reward_scale(&ds, &[]);
        let ranked = rank_pools(&ds, &e, scaling);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].stake, 10_000_000.0);
        // Pledge was clamped at load.
        assert_eq!(ranked[0].pledge, 10_000_000.0);
        assert_eq!(ranked[0].group, PoolGroup::MultiOperator);
    }

    #[test]
    fn empty_dataset_ranks_nothing() {
        assert!(rank_pools(&PoolDataset::default(), &engine(RewardsMode::Max), RewardScaling::IDENTITY).is_empty());
    }
}
