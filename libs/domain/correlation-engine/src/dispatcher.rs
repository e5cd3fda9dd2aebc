// [libs/domain/correlation-engine/src/dispatcher.rs]
//! C11 — Event Dispatcher: per-alert classification and routing. An alert
//! matching multiple categories triggers every applicable branch, in the
//! fixed order the design mandates.

use crate::alert_store::AlertStore;
use crate::cluster_index::ClusterIndex;
use crate::config::EngineConfig;
use crate::context_store::ContextStore;
use crate::decision;
use crate::error::EngineError;
use crate::extractor;
use crate::registry::BotRegistry;
use crate::suppression::SuppressionSets;
use aegis_chain_client::ChainClient;
use aegis_domain_models::{AlertEvent, AlertRecord, ContextEntry, ContextKind, Finding};
use aegis_label_client::LabelClient;
use tracing::{info, instrument, warn};

/// All engine-owned mutable state the dispatcher touches per alert. Bundled
/// into one struct so the engine wrapper can guard it behind a single lock.
pub struct EngineState {
    pub clusters: ClusterIndex,
    pub alerts: AlertStore,
    pub context: ContextStore,
    pub suppression: SuppressionSets,
}

impl EngineState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            clusters: ClusterIndex::new(config.entity_clusters_capacity),
            alerts: AlertStore::new(),
            context: ContextStore::new(config.context_capacity),
            suppression: SuppressionSets::new(
                config.fp_mitigation_clusters_capacity,
                config.end_user_attack_clusters_capacity,
                config.alerted_clusters_capacity,
            ),
        }
    }

    fn resolve_cluster(&self, address: &str) -> String {
        self.clusters.membership(address)
    }
}

/// Metadata omitting the score, or carrying one `<= 0`, both fall back to
/// the configured default; values above 1.0 clamp down to 1.0.
fn clamp_anomaly_score(raw: Option<&String>, default_anomaly_score: f64) -> f64 {
    match raw.and_then(|s| s.parse::<f64>().ok()) {
        Some(parsed) if parsed > 1.0 => 1.0,
        Some(parsed) if parsed <= 0.0 => default_anomaly_score,
        Some(parsed) => parsed,
        None => default_anomaly_score,
    }
}

fn anomaly_score_from_metadata(alert: &AlertEvent, default_anomaly_score: f64) -> f64 {
    let raw = alert.metadata.get("anomaly_score").or_else(|| alert.metadata.get("anomalyScore"));
    if raw.is_none() {
        warn!(alert_hash = %alert.alert_hash, "no anomaly_score in metadata, using default");
    }
    clamp_anomaly_score(raw, default_anomaly_score)
}

/// Dispatches one inbound alert against engine state, producing zero or
/// more findings. Chain validation is the caller's responsibility (raising
/// [`EngineError::WrongChainAlert`] happens before this is ever invoked).
#[instrument(skip(state, registry, config, chain_client, label_client, alert), fields(alert_hash = %alert.alert_hash, bot_id = %alert.bot_id))]
#[allow(clippy::too_many_arguments)]
pub async fn dispatch(
    alert: &AlertEvent,
    state: &mut EngineState,
    registry: &BotRegistry,
    config: &EngineConfig,
    chain_client: &dyn ChainClient,
    label_client: &dyn LabelClient,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    // 1. Cluster-bot: update the cluster index, migrating prior evidence
    //    and re-keying suppression-set membership for every member address.
    if registry.is_entity_cluster_alert(&alert.bot_id, &alert.alert_id) {
        if let Some(entity_addresses) = alert.metadata.get("entityAddresses") {
            info!(cluster_alert = true, "processing entity-cluster alert");
            let (cluster, addresses) = state.clusters.register(entity_addresses);
            for address in &addresses {
                state.alerts.migrate(address, &cluster);
                state.suppression.propagate_rekey(address, &cluster);
            }
        }
    }

    // 2. Context-bot: tag victim vs. profit and append to the context store.
    if registry.is_context_bot(&alert.bot_id) {
        let kind = if registry.is_victim_bot(&alert.bot_id) {
            ContextKind::Victim
        } else {
            ContextKind::Profit
        };
        state.context.append(&alert.source.transaction_hash, ContextEntry { kind, metadata: alert.metadata.clone() });
    }

    // 3. FP-mitigation bot: resolve the subject address to its cluster and
    //    record the suppression tag.
    if registry.is_fp_mitigation_alert(&alert.bot_id, &alert.alert_id) {
        if let Some(address) = extractor::extract_address_from_description(&alert.description) {
            let cluster = state.resolve_cluster(&address);
            state.suppression.fp_mitigation_clusters.insert(&cluster);
        }
    }

    // 4. End-user-attack bot: extract each subject address, resolve, and
    //    record the suppression tag.
    if registry.is_end_user_bot(&alert.bot_id) {
        for address in extractor::end_user_attack_addresses(alert) {
            let cluster = state.resolve_cluster(&address);
            state.suppression.end_user_attack_clusters.insert(&cluster);
        }
    }

    // 5. Base-bot: extract candidate attackers, append evidence, and run
    //    the decision pipeline for each resolved cluster.
    if let Some(stage) = registry.stage_for(&alert.bot_id, &alert.alert_id) {
        let window_start = decision::window_start(config);
        let anomaly_score = anomaly_score_from_metadata(alert, config.default_anomaly_score);

        for address in extractor::candidate_attackers(alert) {
            let cluster = state.resolve_cluster(&address);

            let record = AlertRecord {
                stage,
                created_at: alert.created_at,
                anomaly_score,
                alert_hash: alert.alert_hash.clone(),
                bot_id: alert.bot_id.clone(),
                alert_id: alert.alert_id.clone(),
                chain_id: Some(alert.effective_chain_id()),
                addresses: alert.addresses.clone(),
                transaction_hash: alert.source.transaction_hash.clone(),
            };
            state.alerts.append(&cluster, record);
            state.alerts.prune(&cluster, window_start);

            if let Some(finding) = decision::evaluate(
                &cluster,
                &alert.alert_hash,
                alert.source.block.number,
                config,
                registry,
                &state.alerts,
                &state.context,
                &mut state.suppression,
                chain_client,
                label_client,
            )
            .await
            {
                findings.push(finding);
            }
        }
    }

    findings
}

/// Validates the alert's source chain against the engine's configuration,
/// per the accept-chain-1-on-L2 fan-in rule.
pub fn validate_chain(alert: &AlertEvent, config: &EngineConfig) -> Result<(), EngineError> {
    let observed = alert.effective_chain_id();
    if config.accepts_chain(observed) {
        Ok(())
    } else {
        Err(EngineError::WrongChainAlert { alert_chain: observed, engine_chain: config.chain_id })
    }
}
