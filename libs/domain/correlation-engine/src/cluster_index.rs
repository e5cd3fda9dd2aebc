// [libs/domain/correlation-engine/src/cluster_index.rs]
//! C5 — Cluster Index: address -> off-chain-identity cluster mapping, with
//! bounded FIFO eviction. Cluster-membership events may arrive after alerts
//! for member addresses, so migration of prior evidence is mandatory.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Maps addresses to the canonical cluster string they belong to. Lookup
/// for an address never seen falls back to the address itself, so callers
/// can always treat the result as "the cluster".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterIndex {
    membership: HashMap<String, String>,
    insertion_order: VecDeque<String>,
    capacity: usize,
}

impl ClusterIndex {
    pub fn new(capacity: usize) -> Self {
        Self {
            membership: HashMap::new(),
            insertion_order: VecDeque::new(),
            capacity,
        }
    }

    pub fn membership(&self, address: &str) -> String {
        self.membership.get(address).cloned().unwrap_or_else(|| address.to_string())
    }

    /// Normalizes an `entityAddresses` metadata value into the cluster key
    /// (lowercased, comma-joined) and the split address list.
    pub fn normalize(entity_addresses: &str) -> (String, Vec<String>) {
        let addresses: Vec<String> = entity_addresses
            .split(',')
            .map(|a| a.trim().to_lowercase())
            .collect();
        let cluster = addresses.join(",");
        (cluster, addresses)
    }

    /// Records a new cluster-membership alert, returning the normalized
    /// cluster key and its member addresses so the caller can migrate alert
    /// history and suppression tags for each address.
    pub fn register(&mut self, entity_addresses: &str) -> (String, Vec<String>) {
        let (cluster, addresses) = Self::normalize(entity_addresses);
        for address in &addresses {
            if !self.membership.contains_key(address) {
                self.insertion_order.push_back(address.clone());
            }
            self.membership.insert(address.clone(), cluster.clone());
        }
        self.enforce_capacity();
        (cluster, addresses)
    }

    fn enforce_capacity(&mut self) {
        while self.membership.len() > self.capacity {
            match self.insertion_order.pop_front() {
                Some(oldest) => {
                    self.membership.remove(&oldest);
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.membership.len()
    }

    pub fn is_empty(&self) -> bool {
        self.membership.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_defaults_to_the_address_itself() {
        let index = ClusterIndex::new(10);
        assert_eq!(index.membership("0xabc"), "0xabc");
    }

    #[test]
    fn register_unifies_addresses_under_one_cluster() {
        let mut index = ClusterIndex::new(10);
        let (cluster, addrs) = index.register("0xAAA,0xBBB");
        assert_eq!(cluster, "0xaaa,0xbbb");
        assert_eq!(addrs, vec!["0xaaa".to_string(), "0xbbb".to_string()]);
        assert_eq!(index.membership("0xaaa"), "0xaaa,0xbbb");
        assert_eq!(index.membership("0xbbb"), "0xaaa,0xbbb");
    }

    #[test]
    fn capacity_evicts_oldest_address_first() {
        let mut index = ClusterIndex::new(2);
        index.register("0x1");
        index.register("0x2");
        index.register("0x3");
        assert_eq!(index.len(), 2);
        assert_eq!(index.membership("0x1"), "0x1"); // evicted, falls back to itself
        assert_eq!(index.membership("0x3"), "0x3");
    }
}
