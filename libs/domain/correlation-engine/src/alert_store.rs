// [libs/domain/correlation-engine/src/alert_store.rs]
//! C6 — Alert Store: per-cluster evidence series. Holds the window of
//! `AlertRecord`s that back every stage/score computation the decision
//! engine reads.

use aegis_domain_models::{AlertRecord, Stage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AlertStore {
    by_cluster: HashMap<String, Vec<AlertRecord>>,
}

impl AlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, cluster: &str, record: AlertRecord) {
        self.by_cluster.entry(cluster.to_string()).or_default().push(record);
    }

    /// Drops every record older than `window_start` from the cluster's
    /// series. Called before every decision evaluation so stale stages
    /// never contribute to the aggregate score.
    pub fn prune(&mut self, cluster: &str, window_start: DateTime<Utc>) {
        if let Some(records) = self.by_cluster.get_mut(cluster) {
            records.retain(|r| r.created_at > window_start);
        }
    }

    /// Moves `old_cluster`'s series under `new_cluster`, concatenating if
    /// the destination already has a series. Used when the cluster index
    /// learns that an address belongs to a wider identity.
    pub fn migrate(&mut self, old_cluster: &str, new_cluster: &str) {
        if old_cluster == new_cluster {
            return;
        }
        if let Some(mut old_records) = self.by_cluster.remove(old_cluster) {
            self.by_cluster
                .entry(new_cluster.to_string())
                .or_default()
                .append(&mut old_records);
        }
    }

    pub fn records(&self, cluster: &str) -> &[AlertRecord] {
        self.by_cluster.get(cluster).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn distinct_bot_count(&self, cluster: &str) -> usize {
        self.records(cluster)
            .iter()
            .map(|r| r.bot_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn distinct_bot_alert_pairs(&self, cluster: &str) -> HashSet<(String, String)> {
        self.records(cluster)
            .iter()
            .map(|r| (r.bot_id.clone(), r.alert_id.clone()))
            .collect()
    }

    pub fn distinct_stages(&self, cluster: &str) -> HashSet<Stage> {
        self.records(cluster).iter().map(|r| r.stage).collect()
    }

    /// Distinct `(stage, score)` pairs, collapsed to the minimum score
    /// observed per stage. This is the input to the aggregate anomaly
    /// score: a stage repeated with the same score twice must not count
    /// twice, but two different scores for the same stage both matter
    /// until the minimum is taken.
    pub fn per_stage_min_score(&self, cluster: &str) -> BTreeMap<Stage, f64> {
        let mut seen_pairs: HashSet<(Stage, u64)> = HashSet::new();
        let mut mins: BTreeMap<Stage, f64> = BTreeMap::new();
        for record in self.records(cluster) {
            let pair_key = (record.stage, record.anomaly_score.to_bits());
            if !seen_pairs.insert(pair_key) {
                continue;
            }
            mins.entry(record.stage)
                .and_modify(|min| {
                    if record.anomaly_score < *min {
                        *min = record.anomaly_score;
                    }
                })
                .or_insert(record.anomaly_score);
        }
        mins
    }

    /// Product of the per-stage minimum scores. Empty series score 0.0,
    /// since a decision is never reached without at least one record.
    pub fn aggregate_score(&self, cluster: &str) -> f64 {
        let mins = self.per_stage_min_score(cluster);
        if mins.is_empty() {
            return 0.0;
        }
        mins.values().product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_domain_models::AlertRecord;
    use chrono::TimeZone;

    fn record(bot_id: &str, alert_id: &str, stage: Stage, score: f64, when: i64) -> AlertRecord {
        AlertRecord {
            stage,
            created_at: Utc.timestamp_opt(when, 0).unwrap(),
            anomaly_score: score,
            alert_hash: format!("hash-{when}"),
            bot_id: bot_id.to_string(),
            alert_id: alert_id.to_string(),
            chain_id: Some(1),
            addresses: vec![],
            transaction_hash: format!("tx-{when}"),
        }
    }

    #[test]
    fn aggregate_score_takes_min_per_stage_then_products() {
        let mut store = AlertStore::new();
        store.append("c1", record("b1", "a1", Stage::Funding, 0.5, 1));
        store.append("c1", record("b2", "a2", Stage::Funding, 0.2, 2));
        store.append("c1", record("b3", "a3", Stage::Exploitation, 0.9, 3));
        let mins = store.per_stage_min_score("c1");
        assert_eq!(mins.get(&Stage::Funding), Some(&0.2));
        assert_eq!(mins.get(&Stage::Exploitation), Some(&0.9));
        assert!((store.aggregate_score("c1") - 0.18).abs() < 1e-9);
    }

    #[test]
    fn duplicate_stage_score_pair_counts_once() {
        let mut store = AlertStore::new();
        store.append("c1", record("b1", "a1", Stage::Funding, 0.5, 1));
        store.append("c1", record("b1", "a1", Stage::Funding, 0.5, 2));
        assert_eq!(store.distinct_bot_count("c1"), 1);
        assert!((store.aggregate_score("c1") - 0.5).abs() < 1e-9);
    }

    #[test]
    fn migrate_concatenates_series_under_new_cluster() {
        let mut store = AlertStore::new();
        store.append("0xaaa", record("b1", "a1", Stage::Funding, 0.5, 1));
        store.append("0xbbb", record("b2", "a2", Stage::Preparation, 0.4, 2));
        store.migrate("0xaaa", "0xaaa,0xbbb");
        store.migrate("0xbbb", "0xaaa,0xbbb");
        assert_eq!(store.records("0xaaa,0xbbb").len(), 2);
        assert!(store.records("0xaaa").is_empty());
    }

    #[test]
    fn prune_drops_records_at_or_before_window_start() {
        let mut store = AlertStore::new();
        store.append("c1", record("b1", "a1", Stage::Funding, 0.5, 1));
        store.append("c1", record("b2", "a2", Stage::Funding, 0.6, 100));
        store.prune("c1", Utc.timestamp_opt(50, 0).unwrap());
        assert_eq!(store.records("c1").len(), 1);
        assert_eq!(store.records("c1")[0].bot_id, "b2");
    }
}
