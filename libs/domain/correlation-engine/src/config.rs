// [libs/domain/correlation-engine/src/config.rs]
//! Engine-wide configuration: chain identity, thresholds, and store
//! capacities. Constructed once at startup and treated as immutable for
//! the lifetime of the engine.

use chrono::Duration;

/// Chains whose deployments additionally subscribe to, and accept, chain-1
/// alerts (their L1 fan-in).
pub const L2_CHAIN_IDS: [u64; 2] = [10, 42161];

/// The chain id whose fee-transfer receipt heuristic the chain client
/// implements (Polygon).
pub const VALIDATOR_HEURISTIC_CHAIN_ID: u64 = 137;

/// Chains this engine has dedicated handling for: Ethereum mainnet, the two
/// L2 fan-in targets, and Polygon (the validator-heuristic chain). A
/// deployment configured for any other chain id is a configuration error —
/// none of the FP-mitigation or L1/L2 rules would ever apply to it.
pub const SUPPORTED_CHAIN_IDS: [u64; 4] = [1, 10, 42161, VALIDATOR_HEURISTIC_CHAIN_ID];

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub chain_id: u64,
    /// In non-production mode the persistor runs synchronously after every
    /// alert, for dev durability; in production it only runs on its own
    /// timer.
    pub production: bool,

    pub min_alerts_count: usize,
    pub strict_threshold: f64,
    pub loose_threshold: f64,
    pub default_anomaly_score: f64,
    pub lookback_window: Duration,
    pub polygon_validator_alert_count_threshold: usize,

    pub entity_clusters_capacity: usize,
    pub fp_mitigation_clusters_capacity: usize,
    pub end_user_attack_clusters_capacity: usize,
    pub context_capacity: usize,
    pub alerted_clusters_capacity: usize,
}

impl EngineConfig {
    pub fn new(chain_id: u64, production: bool) -> Self {
        Self {
            chain_id,
            production,
            min_alerts_count: 3,
            strict_threshold: 1e-8,
            loose_threshold: 1e-5,
            default_anomaly_score: 0.5,
            lookback_window: Duration::hours(24),
            polygon_validator_alert_count_threshold: 20,
            entity_clusters_capacity: 50_000,
            fp_mitigation_clusters_capacity: 100_000,
            end_user_attack_clusters_capacity: 10_000,
            context_capacity: 10_000,
            alerted_clusters_capacity: 10_000,
        }
    }

    pub fn is_l2(&self) -> bool {
        L2_CHAIN_IDS.contains(&self.chain_id)
    }

    /// True if `chain_id` is acceptable for this deployment: its own chain,
    /// or chain 1 when this deployment is an L2's fan-in target.
    pub fn accepts_chain(&self, chain_id: u64) -> bool {
        chain_id == self.chain_id || (self.is_l2() && chain_id == 1)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(1, false)
    }
}
