// [libs/domain/correlation-engine/src/decision.rs]
//! C10 — Decision Engine: the per-cluster evaluation pipeline run once per
//! candidate attacker address on every base-bot alert.

use crate::alert_store::AlertStore;
use crate::config::{EngineConfig, VALIDATOR_HEURISTIC_CHAIN_ID};
use crate::context_store::ContextStore;
use crate::registry::BotRegistry;
use crate::suppression::SuppressionSets;
use aegis_chain_client::ChainClient;
use aegis_domain_models::{Finding, FindingMetadata, Severity};
use aegis_label_client::LabelClient;
use chrono::Utc;
use tracing::{info, warn};

const NON_ATTACKER_LABEL_TERMS: [&str; 7] = ["attack", "phish", "hack", "heist", "exploit", "scam", "fraud"];
const HEX_CHARS: &str = "abcdef0123456789";

/// Repeated-character heuristic: any single hex char repeated nine times
/// consecutively disqualifies the string as a plausible address.
fn is_plausible_address(cluster: &str) -> bool {
    let lower = cluster.to_lowercase();
    for c in HEX_CHARS.chars() {
        let needle: String = std::iter::repeat(c).take(9).collect();
        if lower.contains(&needle) {
            return false;
        }
    }
    true
}

fn label_implies_attacker(label: &str) -> bool {
    let lower = label.to_lowercase();
    lower.is_empty() || NON_ATTACKER_LABEL_TERMS.iter().any(|t| lower.contains(t))
}

/// Evaluates the decision pipeline for one candidate cluster, given that
/// the triggering alert has already been appended to `alerts` and the
/// window has been pruned. Returns `Ok(None)` for every non-emitting
/// outcome (ineligible, gated out, suppressed, already alerted).
#[allow(clippy::too_many_arguments)]
pub async fn evaluate(
    cluster: &str,
    triggering_alert_hash: &str,
    triggering_block_number: u64,
    config: &EngineConfig,
    registry: &BotRegistry,
    alerts: &AlertStore,
    context: &ContextStore,
    suppression: &mut SuppressionSets,
    chain_client: &dyn ChainClient,
    label_client: &dyn LabelClient,
) -> Option<Finding> {
    if !is_plausible_address(cluster) {
        info!(cluster, "rejected: not a plausible address");
        return None;
    }

    match chain_client.is_contract(cluster).await {
        Ok(true) => {
            info!(cluster, "rejected: cluster is a contract");
            return None;
        }
        Ok(false) => {}
        Err(e) => warn!(cluster, error = %e, "contract check failed, treating as non-contract"),
    }

    let records = alerts.records(cluster);
    let distinct_bots = alerts.distinct_bot_count(cluster);
    let distinct_stages = alerts.distinct_stages(cluster);
    let stage_scores = alerts.per_stage_min_score(cluster);
    let aggregate_score = alerts.aggregate_score(cluster);
    let highly_precise_count = alerts
        .distinct_bot_alert_pairs(cluster)
        .iter()
        .filter(|(bot_id, alert_id)| registry.is_highly_precise(bot_id, alert_id))
        .count();

    if !(distinct_bots >= config.min_alerts_count || highly_precise_count > 0) {
        return None;
    }

    let triggers = aggregate_score < config.loose_threshold
        || distinct_stages.len() == 4
        || (highly_precise_count > 0 && distinct_stages.len() > 1);
    if !triggers {
        return None;
    }

    if config.is_l2() && !records.iter().any(|r| r.chain_id == Some(config.chain_id)) {
        info!(cluster, "rejected: L2 deployment has no same-chain evidence yet");
        return None;
    }

    let mut fp_mitigated = false;

    let label = match label_client.lookup_label(cluster).await {
        Ok(label) => label,
        Err(e) => {
            warn!(cluster, error = %e, "label lookup failed, treating as no label");
            String::new()
        }
    };
    if !label_implies_attacker(&label) {
        fp_mitigated = true;
    }

    let is_validator_chain_overloaded =
        config.chain_id == VALIDATOR_HEURISTIC_CHAIN_ID && records.len() > config.polygon_validator_alert_count_threshold;
    let matches_validator = match chain_client.fee_transfer_validator(triggering_block_number).await {
        Ok(Some(validator)) => cluster.contains(&validator),
        Ok(None) => false,
        Err(e) => {
            warn!(cluster, error = %e, "validator receipt scan failed, treating as no match");
            false
        }
    };
    if is_validator_chain_overloaded || matches_validator {
        fp_mitigated = true;
    }

    if suppression.fp_mitigation_clusters.contains(cluster) {
        fp_mitigated = true;
    }

    let end_user = suppression.end_user_attack_clusters.contains(cluster);

    let (victim_address, victim_label, _) = context
        .lookup_victim(records)
        .map(|(a, l, m)| (Some(a), Some(l), Some(m)))
        .unwrap_or((None, None, None));
    let loss = context.lookup_loss(records);

    let metadata = FindingMetadata {
        anomaly_score: aggregate_score,
        stage_scores,
        triggering_alert_hash: triggering_alert_hash.to_string(),
        chain_id: config.chain_id,
    };

    let four_stages = distinct_stages.len() == 4;
    let precise_shortcut = (highly_precise_count > 0 && distinct_stages.len() > 1) || highly_precise_count > 1;
    let strict_score = distinct_bots >= config.min_alerts_count && aggregate_score < config.strict_threshold;
    let loose_score = distinct_bots >= config.min_alerts_count && aggregate_score < config.loose_threshold;

    // Each T1-T4 condition only counts toward "would an unmitigated tier have
    // fired" once its own already-alerted gate is also checked — otherwise a
    // cluster that already holds its strict/loose tier keeps tripping T5/T6
    // on every later alert, which the original never does.
    let not_strict_alerted = !suppression.alerted_strict.contains(cluster);
    let not_loose_alerted = !suppression.alerted_loose.contains(cluster);
    let any_t1_t4 = (four_stages && not_strict_alerted)
        || (precise_shortcut && not_strict_alerted)
        || (strict_score && not_strict_alerted)
        || (loose_score && not_loose_alerted && not_strict_alerted);

    let build = |alert_id: &str, severity: Severity, description: String| Finding {
        alert_id: alert_id.to_string(),
        severity,
        cluster: cluster.to_string(),
        description,
        victim_address: victim_address.clone(),
        victim_label: victim_label.clone(),
        loss: loss.clone(),
        metadata: metadata.clone(),
    };

    if !end_user && !fp_mitigated && four_stages && !suppression.alerted_strict.contains(cluster) {
        suppression.alerted_strict.insert(cluster);
        return Some(build(
            "ATTACK-DETECTOR-1",
            Severity::Critical,
            format!("All four attack stages observed for cluster {cluster}"),
        ));
    }
    if !end_user && !fp_mitigated && precise_shortcut && !suppression.alerted_strict.contains(cluster) {
        suppression.alerted_strict.insert(cluster);
        return Some(build(
            "ATTACK-DETECTOR-2",
            Severity::Critical,
            format!("Highly-precise detector corroborated for cluster {cluster}"),
        ));
    }
    if !end_user && !fp_mitigated && strict_score && !suppression.alerted_strict.contains(cluster) {
        suppression.alerted_strict.insert(cluster);
        return Some(build(
            "ATTACK-DETECTOR-3",
            Severity::Critical,
            format!("Aggregate anomaly score below strict threshold for cluster {cluster}"),
        ));
    }
    if !end_user
        && !fp_mitigated
        && loose_score
        && !suppression.alerted_loose.contains(cluster)
        && !suppression.alerted_strict.contains(cluster)
    {
        suppression.alerted_loose.insert(cluster);
        return Some(build(
            "ATTACK-DETECTOR-4",
            Severity::Low,
            format!("Aggregate anomaly score below loose threshold for cluster {cluster}"),
        ));
    }
    if !end_user && fp_mitigated && any_t1_t4 && !suppression.alerted_fp_mitigated.contains(cluster) {
        suppression.alerted_fp_mitigated.insert(cluster);
        return Some(build(
            "ATTACK-DETECTOR-5",
            Severity::Info,
            format!("FP-mitigated attack pattern for cluster {cluster}"),
        ));
    }
    if end_user && !fp_mitigated && any_t1_t4 && !suppression.alerted_fp_mitigated.contains(cluster) {
        suppression.alerted_fp_mitigated.insert(cluster);
        return Some(build(
            "ATTACK-DETECTOR-6",
            Severity::Info,
            format!("End-user-attack pattern downgraded for cluster {cluster}"),
        ));
    }

    None
}

/// `now` is exposed for callers that need to reason about staleness before
/// invoking [`evaluate`] (the pruning itself happens in [`AlertStore::prune`]).
pub fn window_start(config: &EngineConfig) -> chrono::DateTime<Utc> {
    Utc::now() - config.lookback_window
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plausible_address_rejects_long_character_runs() {
        assert!(!is_plausible_address("0xaaaaaaaaaa0000000000000000000000000000"));
        assert!(is_plausible_address("0x1234567890abcdef1234567890abcdef12345678"));
    }

    #[test]
    fn label_implies_attacker_treats_empty_as_attacker() {
        assert!(label_implies_attacker(""));
        assert!(label_implies_attacker("Known Phishing Actor"));
        assert!(!label_implies_attacker("Binance Hot Wallet"));
    }
}
