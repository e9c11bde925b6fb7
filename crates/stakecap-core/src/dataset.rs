//! Pool dataset loading and load-time normalization.
//!
//! The dataset is an exported pool list (JSON array of records). On load:
//! 1. Pledge is clamped to the pool's active stake.
//! 2. Pools with non-positive active stake are dropped.
//! 3. Missing tickers are replaced with `private` plus the last four
//!    characters of the pool id.
//!
//! Loading happens once at startup; schema errors are fatal to the caller.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;
use crate::types::{Pool, PoolGroup};

/// A raw pool record as exported from the chain indexer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PoolRecord {
    #[serde(alias = "pool_id")]
    pub pool_id_bech32: String,
    #[serde(default)]
    pub ticker: Option<String>,
    pub pledge: f64,
    pub active_stake: f64,
    #[serde(default)]
    pub group: PoolGroup,
}

impl PoolRecord {
    fn into_pool(self) -> Option<Pool> {
        if self.active_stake.is_nan() || self.active_stake <= 0.0 {
            return None;
        }
        let ticker = match self.ticker {
            Some(t) => t,
            None => private_ticker(&self.pool_id_bech32),
        };
        Some(Pool {
            pledge: self.pledge.min(self.active_stake),
            active_stake: self.active_stake,
            id: self.pool_id_bech32,
            ticker,
            group: self.group,
        })
    }
}

fn private_ticker(pool_id: &str) -> String {
    let len = pool_id.chars().count();
    let tail: String = pool_id.chars().skip(len.saturating_sub(4)).collect();
    format!("private{tail}")
}

/// Per-group aggregate over the dataset.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GroupSummary {
    pub group: PoolGroup,
    pub pools: usize,
    pub active_stake: f64,
    pub pledge: f64,
}

/// The canonical, immutable pool list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoolDataset {
    pools: Vec<Pool>,
}

impl PoolDataset {
    /// Normalize raw records into the canonical pool list.
    pub fn from_records(records: impl IntoIterator<Item = PoolRecord>) -> Self {
        Self {
            pools: records.into_iter().filter_map(PoolRecord::into_pool).collect(),
        }
    }

    /// Parse a JSON array of pool records.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let records: Vec<PoolRecord> =
            serde_json::from_str(json).map_err(|e| DatasetError::Schema(e.to_string()))?;
        Ok(Self::from_records(records))
    }

    /// Parse a JSON array of pool records from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let records: Vec<PoolRecord> =
            serde_json::from_reader(reader).map_err(|e| DatasetError::Schema(e.to_string()))?;
        Ok(Self::from_records(records))
    }

    /// Load a dataset from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| DatasetError::Io(format!("{}: {e}", path.display())))?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pool> {
        self.pools.iter()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Sum of active stake across all pools.
    pub fn total_active_stake(&self) -> f64 {
        self.pools.iter().map(|p| p.active_stake).sum()
    }

    /// Pool count, stake and pledge per operator group, ordered by group.
    pub fn group_summary(&self) -> Vec<GroupSummary> {
        let mut groups: BTreeMap<PoolGroup, GroupSummary> = BTreeMap::new();
        for pool in &self.pools {
            let entry = groups.entry(pool.group.clone()).or_insert_with(|| GroupSummary {
                group: pool.group.clone(),
                pools: 0,
                active_stake: 0.0,
                pledge: 0.0,
            });
            entry.pools += 1;
            entry.active_stake += pool.active_stake;
            entry.pledge += pool.pledge;
        }
        groups.into_values().collect()
    }

    /// Write one active stake per line, CSV without header.
    ///
    /// Returns the number of rows written.
    pub fn write_stake_distribution<W: Write>(&self, mut writer: W) -> Result<usize, DatasetError> {
        for pool in &self.pools {
            writeln!(writer, "{}", pool.active_stake).map_err(|e| DatasetError::Csv(e.to_string()))?;
        }
        writer.flush().map_err(|e| DatasetError::Csv(e.to_string()))?;
        Ok(self.pools.len())
    }

    /// File name used for the stake distribution export.
    pub fn stake_distribution_file_name(&self) -> String {
        format!("synthetic-stake-distribution-{}-agents.csv", self.pools.len())
    }
}

impl<'a> IntoIterator for &'a PoolDataset {
    type Item = &'a Pool;
    type IntoIter = std::slice::Iter<'a, Pool>;

    fn into_iter(self) -> Self::IntoIter {
        self.pools.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(id: &str, pledge: f64, stake: f64) -> PoolRecord {
        PoolRecord {
            pool_id_bech32: id.to_string(),
            ticker: Some(id.to_uppercase()),
            pledge,
            active_stake: stake,
            group: PoolGroup::SingleOperator,
        }
    }

    // --- normalization ---

    #[test]
    fn pledge_clamped_to_stake() {
        let ds = PoolDataset::from_records(vec![record("a", 5_000_000.0, 1_000_000.0)]);
        assert_eq!(ds.pools()[0].pledge, 1_000_000.0);
        assert_eq!(ds.pools()[0].active_stake, 1_000_000.0);
    }

    #[test]
    fn pledge_below_stake_untouched() {
        let ds = PoolDataset::from_records(vec![record("a", 250_000.0, 1_000_000.0)]);
        assert_eq!(ds.pools()[0].pledge, 250_000.0);
    }

    #[test]
    fn non_positive_stake_dropped() {
        let ds = PoolDataset::from_records(vec![
            record("a", 0.0, 0.0),
            record("b", 0.0, -10.0),
            record("c", 10.0, 100.0),
            record("d", 0.0, f64::NAN),
        ]);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.pools()[0].id, "c");
    }

    #[test]
    fn order_preserved() {
        let ds = PoolDataset::from_records(vec![
            record("x", 1.0, 10.0),
            record("y", 1.0, 20.0),
            record("z", 1.0, 30.0),
        ]);
        let ids: Vec<&str> = ds.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["x", "y", "z"]);
    }

    #[test]
    fn missing_ticker_becomes_private() {
        let json = r#"[{"pool_id_bech32":"pool1abcdwxyz","ticker":null,"pledge":1,"active_stake":2,"group":"MPO"}]"#;
        let ds = PoolDataset::from_json_str(json).unwrap();
        assert_eq!(ds.pools()[0].ticker, "privatewxyz");
        assert_eq!(ds.pools()[0].group, PoolGroup::MultiOperator);
    }

    #[test]
    fn short_pool_id_ticker() {
        assert_eq!(private_ticker("ab"), "privateab");
    }

    // --- parsing ---

    #[test]
    fn parses_exported_records() {
        let json = r#"[
            {"pool_id_bech32":"pool1a","ticker":"AAA","pledge":100,"active_stake":1000,"group":"sSPO"},
            {"pool_id":"pool1b","ticker":"BBB","pledge":5,"active_stake":0,"group":"MPO"}
        ]"#;
        let ds = PoolDataset::from_json_str(json).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.pools()[0].ticker, "AAA");
    }

    #[test]
    fn missing_numeric_field_is_schema_error() {
        let json = r#"[{"pool_id_bech32":"pool1a","ticker":"AAA","pledge":100,"group":"sSPO"}]"#;
        assert!(matches!(
            PoolDataset::from_json_str(json),
            Err(DatasetError::Schema(_))
        ));
    }

    #[test]
    fn null_numeric_field_is_schema_error() {
        let json = r#"[{"pool_id_bech32":"pool1a","pledge":null,"active_stake":5}]"#;
        assert!(matches!(
            PoolDataset::from_json_str(json),
            Err(DatasetError::Schema(_))
        ));
    }

    #[test]
    fn missing_group_defaults_to_single_operator() {
        let json = r#"[{"pool_id_bech32":"pool1a","ticker":"A","pledge":1,"active_stake":5}]"#;
        let ds = PoolDataset::from_json_str(json).unwrap();
        assert_eq!(ds.pools()[0].group, PoolGroup::SingleOperator);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pools.json");
        std::fs::write(
            &path,
            r#"[{"pool_id_bech32":"pool1a","ticker":"A","pledge":1,"active_stake":5,"group":"sSPO"}]"#,
        )
        .unwrap();
        let ds = PoolDataset::load(&path).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PoolDataset::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(DatasetError::Io(_))));
    }

    // --- aggregates ---

    #[test]
    fn total_active_stake_sums() {
        let ds = PoolDataset::from_records(vec![record("a", 1.0, 10.0), record("b", 1.0, 32.5)]);
        assert_eq!(ds.total_active_stake(), 42.5);
    }

    #[test]
    fn group_summary_counts() {
        let mut mpo = record("m", 50.0, 40.0);
        mpo.group = PoolGroup::MultiOperator;
        let ds = PoolDataset::from_records(vec![record("a", 1.0, 10.0), record("b", 2.0, 20.0), mpo]);
        let summary = ds.group_summary();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].group, PoolGroup::SingleOperator);
        assert_eq!(summary[0].pools, 2);
        assert_eq!(summary[0].active_stake, 30.0);
        assert_eq!(summary[1].pools, 1);
        // Clamped pledge is what gets summed.
        assert_eq!(summary[1].pledge, 40.0);
    }

    #[test]
    fn empty_dataset() {
        let ds = PoolDataset::from_json_str("[]").unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.total_active_stake(), 0.0);
        assert!(ds.group_summary().is_empty());
    }

    // --- stake distribution export ---

    #[test]
    fn stake_distribution_lines() {
        let ds = PoolDataset::from_records(vec![
            record("a", 1.0, 1_000_000.0),
            record("b", 1.0, 0.0),
            record("c", 1.0, 2_500_000.0),
        ]);
        let mut out = Vec::new();
        let rows = ds.write_stake_distribution(&mut out).unwrap();
        assert_eq!(rows, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "1000000\n2500000\n");
        assert_eq!(
            ds.stake_distribution_file_name(),
            "synthetic-stake-distribution-2-agents.csv"
        );
    }

    // --- proptest ---

    proptest! {
        #[test]
        fn normalized_pools_respect_invariants(
            raw in prop::collection::vec((-1e6f64..1e9, -1e6f64..1e9), 0..50),
        ) {
            let records: Vec<PoolRecord> = raw
                .iter()
                .enumerate()
                .map(|(i, (pledge, stake))| record(&format!("pool{i}"), *pledge, *stake))
                .collect();
            let ds = PoolDataset::from_records(records);
            for pool in &ds {
                prop_assert!(pool.active_stake > 0.0);
                prop_assert!(pool.pledge <= pool.active_stake);
            }
            let expected = raw.iter().filter(|(_, s)| *s > 0.0).count();
            prop_assert_eq!(ds.len(), expected);
        }
    }
}
