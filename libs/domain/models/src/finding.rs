// [libs/domain/models/src/finding.rs]
//! The consolidated high-confidence output of the correlation engine.

use crate::stage::Stage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Severity tiers the decision engine assigns to a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    Low,
    Info,
}

/// Enrichment payload carried alongside every finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingMetadata {
    pub anomaly_score: f64,
    pub stage_scores: BTreeMap<Stage, f64>,
    pub triggering_alert_hash: String,
    pub chain_id: u64,
}

/// One consolidated, actionable attack finding for a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// `ATTACK-DETECTOR-1` .. `ATTACK-DETECTOR-6`.
    pub alert_id: String,
    pub severity: Severity,
    pub cluster: String,
    pub description: String,
    pub victim_address: Option<String>,
    pub victim_label: Option<String>,
    pub loss: Option<String>,
    pub metadata: FindingMetadata,
}
