// [libs/domain/models/src/alert.rs]
//! Inbound alert shape as delivered by the upstream alert bus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A reputation label attached to an entity by an upstream detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub label: String,
    pub entity: String,
    #[serde(default)]
    pub confidence: f64,
}

/// The on-chain block the alert was raised against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRef {
    pub chain_id: Option<u64>,
    pub number: u64,
}

/// Provenance of the alert: the transaction and block that triggered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSource {
    pub transaction_hash: String,
    pub block: BlockRef,
}

/// One event delivered by the alert bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub alert_hash: String,
    pub alert_id: String,
    pub bot_id: String,
    pub chain_id: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub source: AlertSource,
}

impl AlertEvent {
    /// The chain the underlying block belongs to, falling back to the
    /// alert's own `chain_id` when the block doesn't carry one.
    pub fn effective_chain_id(&self) -> u64 {
        self.source.block.chain_id.unwrap_or(self.chain_id)
    }
}
