// [libs/domain/correlation-engine/src/extractor.rs]
//! C9 — Attacker Extractor: derives candidate attacker addresses from an
//! alert's labels/metadata, with a dispatch table for the end-user-attack
//! bots that name their subject address in a bot-specific metadata field.

use aegis_domain_models::AlertEvent;
use once_cell::sync::Lazy;
use regex::Regex;

const ATTACKER_TERMS: [&str; 3] = ["attack", "exploit", "scam"];

static ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"0x[0-9a-fA-F]{40}").unwrap());

fn is_hex_address(value: &str) -> bool {
    value.len() == 42 && value.starts_with("0x") && value[2..].chars().all(|c| c.is_ascii_hexdigit())
}

fn mentions_attacker_term(haystack: &str) -> bool {
    let lower = haystack.to_lowercase();
    ATTACKER_TERMS.iter().any(|term| lower.contains(term))
}

/// Candidate attacker addresses for a base-bot alert: labels first, then
/// metadata values under suspiciously-named keys, falling back to the
/// alert's raw `addresses` field when neither yields anything. Never
/// de-duplicates against contracts — that filter belongs to the decision
/// engine.
pub fn candidate_attackers(alert: &AlertEvent) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    for label in &alert.labels {
        if mentions_attacker_term(&label.label) {
            candidates.push(label.entity.to_lowercase());
        }
    }

    for (key, value) in &alert.metadata {
        let key_lower = key.to_lowercase();
        let mentions = ATTACKER_TERMS.iter().any(|t| key_lower.contains(t)) || key_lower.contains("caller");
        if mentions && is_hex_address(value) {
            candidates.push(value.to_lowercase());
        }
    }

    if candidates.is_empty() {
        candidates.extend(alert.addresses.iter().map(|a| a.to_lowercase()));
    }

    candidates
}

/// First substring matching a 40-hex-digit address, lowercased. Used for
/// FP-mitigation alerts, whose subject address rides in free-text
/// `description` rather than a structured field.
pub fn extract_address_from_description(description: &str) -> Option<String> {
    ADDRESS_PATTERN.find(description).map(|m| m.as_str().to_lowercase())
}

const HARD_RUG_PULL_BOT_ID: &str = "0xc608f1aff80657091ad14d974ea37607f6e7513fdb8afaa148b3bff5ba305c15";
const SOFT_RUG_PULL_BOT_ID: &str = "0xf234f56095ba6c4c4782045f6d8e95d22da360bdc41b75c0549e2713a93231a4";
const RAKE_TOKEN_CONTRACT_BOT_ID: &str = "0x36be2983e82680996e6ccc2ab39a506444ab7074677e973136fa8d914fc5dd11";

/// End-user-attack addresses: a small per-botId dispatch table, each entry
/// reading a bot-specific metadata field.
///
/// The hard-rug-pull camelCase branch intentionally reads the snake_case
/// value when the camelCase key is merely present — reproducing a known
/// quirk rather than silently "fixing" behavior downstream consumers may
/// already depend on.
pub fn end_user_attack_addresses(alert: &AlertEvent) -> Vec<String> {
    let mut addresses: Vec<String> = Vec::new();

    if alert.bot_id == HARD_RUG_PULL_BOT_ID {
        if let Some(v) = alert.metadata.get("attacker_deployer_address") {
            addresses.push(v.to_lowercase());
        }
        if alert.metadata.contains_key("attackerDeployerAddress") {
            if let Some(v) = alert.metadata.get("attacker_deployer_address") {
                addresses.push(v.to_lowercase());
            }
        }
    } else if alert.bot_id == SOFT_RUG_PULL_BOT_ID {
        if let Some(v) = alert.metadata.get("deployer") {
            addresses.push(v.to_lowercase());
        }
    } else if alert.bot_id == RAKE_TOKEN_CONTRACT_BOT_ID {
        if let Some(v) = alert.metadata.get("attackerRakeTokenDeployer") {
            addresses.push(v.to_lowercase());
        }
        if let Some(v) = alert.metadata.get("attacker_rake_token_deployer") {
            addresses.push(v.to_lowercase());
        }
    }

    addresses.sort();
    addresses.dedup();
    addresses
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_domain_models::{AlertSource, BlockRef, Label};
    use chrono::Utc;
    use std::collections::HashMap;

    fn base_alert(bot_id: &str) -> AlertEvent {
        AlertEvent {
            alert_hash: "h".to_string(),
            alert_id: "a".to_string(),
            bot_id: bot_id.to_string(),
            chain_id: 1,
            created_at: Utc::now(),
            description: String::new(),
            addresses: vec![],
            metadata: HashMap::new(),
            labels: vec![],
            source: AlertSource {
                transaction_hash: "tx".to_string(),
                block: BlockRef { chain_id: None, number: 1 },
            },
        }
    }

    #[test]
    fn labels_matching_attacker_terms_win_over_fallback() {
        let mut alert = base_alert("bot");
        alert.labels.push(Label {
            label: "Scammer".to_string(),
            entity: "0xAAA".to_string(),
            confidence: 1.0,
        });
        alert.addresses.push("0xfallback".to_string());
        assert_eq!(candidate_attackers(&alert), vec!["0xaaa".to_string()]);
    }

    #[test]
    fn metadata_key_containing_caller_is_picked_up() {
        let mut alert = base_alert("bot");
        let address = "0x1111111111111111111111111111111111111111";
        alert.metadata.insert("callerAddress".to_string(), address.to_string());
        assert_eq!(candidate_attackers(&alert), vec![address.to_string()]);
    }

    #[test]
    fn falls_back_to_raw_addresses_when_nothing_else_matches() {
        let mut alert = base_alert("bot");
        alert.addresses.push("0xRAW".to_string());
        assert_eq!(candidate_attackers(&alert), vec!["0xraw".to_string()]);
    }

    #[test]
    fn fp_mitigation_description_extraction_takes_first_match() {
        let description = "Subject address 0xABCDEF0000000000000000000000000000ABCD flagged";
        let extracted = extract_address_from_description(description).unwrap();
        assert_eq!(extracted, "0xabcdef0000000000000000000000000000abcd");
    }

    #[test]
    fn hard_rug_pull_camelcase_branch_reads_snake_case_value() {
        let mut alert = base_alert(HARD_RUG_PULL_BOT_ID);
        alert.metadata.insert("attackerDeployerAddress".to_string(), "ignored".to_string());
        alert.metadata.insert("attacker_deployer_address".to_string(), "0xDEPLOYER".to_string());
        assert_eq!(end_user_attack_addresses(&alert), vec!["0xdeployer".to_string()]);
    }

    #[test]
    fn soft_rug_pull_reads_deployer_field() {
        let mut alert = base_alert(SOFT_RUG_PULL_BOT_ID);
        alert.metadata.insert("deployer".to_string(), "0xDEP".to_string());
        assert_eq!(end_user_attack_addresses(&alert), vec!["0xdep".to_string()]);
    }
}
