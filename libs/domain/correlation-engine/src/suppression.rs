// [libs/domain/correlation-engine/src/suppression.rs]
//! C8 — Suppression sets: bounded FIFO membership sets that gate
//! FP-mitigation, end-user downgrade, and at-most-once emission per tier.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// A capacity-bounded set of cluster keys, evicting the oldest member when
/// full. Re-inserting an already-present key is a no-op on ordering (it
/// does not refresh to the back), matching a plain dict-backed set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuppressionSet {
    order: VecDeque<String>,
    members: HashSet<String>,
    capacity: usize,
}

impl SuppressionSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::new(),
            members: HashSet::new(),
            capacity,
        }
    }

    pub fn contains(&self, cluster: &str) -> bool {
        self.members.contains(cluster)
    }

    pub fn insert(&mut self, cluster: &str) {
        if self.members.insert(cluster.to_string()) {
            self.order.push_back(cluster.to_string());
            while self.order.len() > self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.members.remove(&oldest);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The five suppression sets the decision engine consults. FP-mitigation
/// and end-user-attack record cluster keys that downgrade future findings;
/// the three "alerted" sets enforce at-most-once emission per tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuppressionSets {
    pub fp_mitigation_clusters: SuppressionSet,
    pub end_user_attack_clusters: SuppressionSet,
    pub alerted_strict: SuppressionSet,
    pub alerted_loose: SuppressionSet,
    pub alerted_fp_mitigated: SuppressionSet,
}

impl SuppressionSets {
    /// Each set is capped independently: FP-mitigation clusters have their
    /// own (much larger) capacity, while end-user-attack clusters and the
    /// three already-alerted sets share a smaller one.
    pub fn new(fp_mitigation_capacity: usize, end_user_attack_capacity: usize, alerted_capacity: usize) -> Self {
        Self {
            fp_mitigation_clusters: SuppressionSet::new(fp_mitigation_capacity),
            end_user_attack_clusters: SuppressionSet::new(end_user_attack_capacity),
            alerted_strict: SuppressionSet::new(alerted_capacity),
            alerted_loose: SuppressionSet::new(alerted_capacity),
            alerted_fp_mitigated: SuppressionSet::new(alerted_capacity),
        }
    }

    /// Propagates membership of `old_key` to `new_key` across every set
    /// that is tagged by address/cluster key, without removing the old
    /// entry — membership must survive re-keying on cluster merge.
    pub fn propagate_rekey(&mut self, old_key: &str, new_key: &str) {
        if old_key == new_key {
            return;
        }
        for set in [
            &mut self.fp_mitigation_clusters,
            &mut self.end_user_attack_clusters,
            &mut self.alerted_strict,
            &mut self.alerted_loose,
            &mut self.alerted_fp_mitigated,
        ] {
            if set.contains(old_key) {
                set.insert(new_key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_evicts_oldest_member() {
        let mut set = SuppressionSet::new(2);
        set.insert("a");
        set.insert("b");
        set.insert("c");
        assert!(!set.contains("a"));
        assert!(set.contains("b"));
        assert!(set.contains("c"));
    }

    #[test]
    fn reinsert_is_idempotent_and_does_not_reorder() {
        let mut set = SuppressionSet::new(2);
        set.insert("a");
        set.insert("b");
        set.insert("a");
        set.insert("c");
        assert!(!set.contains("a"));
        assert!(set.contains("b"));
        assert!(set.contains("c"));
    }

    #[test]
    fn propagate_rekey_preserves_old_and_adds_new() {
        let mut sets = SuppressionSets::new(10, 10, 10);
        sets.alerted_strict.insert("0xaaa");
        sets.propagate_rekey("0xaaa", "0xaaa,0xbbb");
        assert!(sets.alerted_strict.contains("0xaaa"));
        assert!(sets.alerted_strict.contains("0xaaa,0xbbb"));
    }
}
