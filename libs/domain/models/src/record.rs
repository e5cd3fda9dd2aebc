// [libs/domain/models/src/record.rs]
//! The engine's internal notion of an accumulated alert against a cluster.

use crate::stage::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One base-bot alert, attributed to a cluster and retained until it ages
/// out of the lookback window or the cluster is rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub stage: Stage,
    pub created_at: DateTime<Utc>,
    /// Always in `(0, 1]`; callers must clamp/default before constructing one.
    pub anomaly_score: f64,
    pub alert_hash: String,
    pub bot_id: String,
    pub alert_id: String,
    /// Present only when the alert's source block carried a chain id
    /// distinct from the engine's own (i.e. an L1 alert seen by an L2
    /// deployment).
    pub chain_id: Option<u64>,
    pub addresses: Vec<String>,
    pub transaction_hash: String,
}

/// Which side of victim/loss context an entry annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextKind {
    Victim,
    Profit,
}

/// One piece of context metadata observed on a transaction (victim identity
/// or profit/loss figures), keyed by the transaction hash it was seen on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub kind: ContextKind,
    pub metadata: std::collections::HashMap<String, String>,
}
