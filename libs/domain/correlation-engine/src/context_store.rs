// [libs/domain/correlation-engine/src/context_store.rs]
//! C7 — Context Store: transaction-hash-keyed victim/profit annotations
//! contributed by context bots, consulted when a decision needs to name a
//! victim or quantify a loss.

use aegis_domain_models::{AlertRecord, ContextEntry, ContextKind, Stage};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Serialize, Deserialize)]
pub struct ContextStore {
    by_tx: HashMap<String, Vec<ContextEntry>>,
    insertion_order: VecDeque<String>,
    capacity: usize,
}

impl ContextStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            by_tx: HashMap::new(),
            insertion_order: VecDeque::new(),
            capacity,
        }
    }

    pub fn append(&mut self, transaction_hash: &str, entry: ContextEntry) {
        if !self.by_tx.contains_key(transaction_hash) {
            self.insertion_order.push_back(transaction_hash.to_string());
        }
        self.by_tx.entry(transaction_hash.to_string()).or_default().push(entry);
        while self.by_tx.len() > self.capacity {
            match self.insertion_order.pop_front() {
                Some(oldest) => {
                    self.by_tx.remove(&oldest);
                }
                None => break,
            }
        }
    }

    /// First victim annotation found among the given records' transaction
    /// hashes, as `(address, label, raw_metadata)`.
    pub fn lookup_victim(&self, records: &[AlertRecord]) -> Option<(String, String, HashMap<String, String>)> {
        for record in records {
            let Some(entries) = self.by_tx.get(&record.transaction_hash) else {
                continue;
            };
            for entry in entries {
                if entry.kind == ContextKind::Victim {
                    let address = entry.metadata.get("address1").cloned().unwrap_or_default();
                    let label = entry.metadata.get("tag1").cloned().unwrap_or_default();
                    return Some((address, label, entry.metadata.clone()));
                }
            }
        }
        None
    }

    /// Loss description for the first Exploitation-stage record whose
    /// transaction carries a profit context entry.
    pub fn lookup_loss(&self, records: &[AlertRecord]) -> Option<String> {
        for record in records {
            if record.stage != Stage::Exploitation {
                continue;
            }
            let Some(entries) = self.by_tx.get(&record.transaction_hash) else {
                continue;
            };
            for entry in entries {
                if entry.kind == ContextKind::Profit {
                    if let Some(profit) = entry.metadata.get("profit1") {
                        return Some(format!("Loss of {profit}"));
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn alert_record(transaction_hash: &str, stage: Stage) -> AlertRecord {
        AlertRecord {
            stage,
            created_at: Utc::now(),
            anomaly_score: 0.5,
            alert_hash: "h".to_string(),
            bot_id: "bot".to_string(),
            alert_id: "alert".to_string(),
            chain_id: Some(1),
            addresses: vec![],
            transaction_hash: transaction_hash.to_string(),
        }
    }

    fn victim_entry(address: &str, label: &str) -> ContextEntry {
        let mut metadata = HashMap::new();
        metadata.insert("address1".to_string(), address.to_string());
        metadata.insert("tag1".to_string(), label.to_string());
        ContextEntry { kind: ContextKind::Victim, metadata }
    }

    fn profit_entry(profit: &str) -> ContextEntry {
        let mut metadata = HashMap::new();
        metadata.insert("profit1".to_string(), profit.to_string());
        ContextEntry { kind: ContextKind::Profit, metadata }
    }

    #[test]
    fn victim_lookup_finds_entry_on_shared_transaction() {
        let mut store = ContextStore::new(10);
        store.append("tx1", victim_entry("0xvictim", "Some DAO"));
        let records = vec![alert_record("tx1", Stage::Exploitation)];
        let (address, label, _) = store.lookup_victim(&records).unwrap();
        assert_eq!(address, "0xvictim");
        assert_eq!(label, "Some DAO");
    }

    #[test]
    fn loss_lookup_requires_exploitation_stage() {
        let mut store = ContextStore::new(10);
        store.append("tx1", profit_entry("120 ETH"));
        let non_exploit = vec![alert_record("tx1", Stage::Funding)];
        assert!(store.lookup_loss(&non_exploit).is_none());
        let exploit = vec![alert_record("tx1", Stage::Exploitation)];
        assert_eq!(store.lookup_loss(&exploit), Some("Loss of 120 ETH".to_string()));
    }

    #[test]
    fn capacity_evicts_oldest_transaction_key() {
        let mut store = ContextStore::new(1);
        store.append("tx1", victim_entry("0x1", "A"));
        store.append("tx2", victim_entry("0x2", "B"));
        assert!(store.lookup_victim(&[alert_record("tx1", Stage::Exploitation)]).is_none());
        assert!(store.lookup_victim(&[alert_record("tx2", Stage::Exploitation)]).is_some());
    }
}
