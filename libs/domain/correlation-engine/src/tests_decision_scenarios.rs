// [libs/domain/correlation-engine/src/tests_decision_scenarios.rs]
//! Concrete end-to-end scenarios for the decision pipeline, each starting
//! from empty engine state.

use aegis_chain_client::StubChainClient;
use aegis_correlation_engine::registry::{BaseBot, BotRegistry};
use aegis_correlation_engine::{CorrelationEngine, EngineConfig};
use aegis_domain_models::{AlertEvent, AlertSource, BlockRef, Stage};
use aegis_label_client::StubLabelClient;
use aegis_state_store::InMemoryBlobStore;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;

const FUNDING_BOT: &str = "bot-funding";
const PREP_BOT: &str = "bot-prep";
const EXPLOIT_BOT: &str = "bot-exploit";
const PRECISE_BOT: &str = "bot-precise";
const FP_BOT: &str = "bot-fp";
const HARD_RUG_PULL_BOT_ID: &str = "0xc608f1aff80657091ad14d974ea37607f6e7513fdb8afaa148b3bff5ba305c15";
const CLUSTER_BOT: &str = "bot-cluster";
const VICTIM_BOT: &str = "bot-victim";
const PROFIT_BOT: &str = "bot-profit";

fn addr(tag: &str) -> String {
    format!("0x{}", tag.repeat(20))
}

fn test_registry() -> BotRegistry {
    BotRegistry::new(
        vec![
            BaseBot { bot_id: FUNDING_BOT.into(), alert_id: "ALERT-FUNDING".into(), stage: Stage::Funding },
            BaseBot { bot_id: PREP_BOT.into(), alert_id: "ALERT-PREP".into(), stage: Stage::Preparation },
            BaseBot { bot_id: EXPLOIT_BOT.into(), alert_id: "ALERT-EXPLOIT".into(), stage: Stage::Exploitation },
            BaseBot { bot_id: PRECISE_BOT.into(), alert_id: "ALERT-PRECISE-A".into(), stage: Stage::Funding },
            BaseBot { bot_id: PRECISE_BOT.into(), alert_id: "ALERT-PRECISE-B".into(), stage: Stage::Preparation },
        ],
        vec![
            (PRECISE_BOT.to_string(), "ALERT-PRECISE-A".to_string()),
            (PRECISE_BOT.to_string(), "ALERT-PRECISE-B".to_string()),
        ],
        vec![(FP_BOT.to_string(), "ALERT-FP".to_string())],
        vec![HARD_RUG_PULL_BOT_ID.to_string()],
        vec![VICTIM_BOT.to_string(), PROFIT_BOT.to_string()],
        VICTIM_BOT.to_string(),
        (CLUSTER_BOT.to_string(), "ALERT-CLUSTER".to_string()),
    )
}

async fn new_engine(chain_id: u64) -> CorrelationEngine {
    CorrelationEngine::initialize(
        EngineConfig::new(chain_id, false),
        test_registry(),
        Arc::new(StubChainClient::new()),
        Arc::new(StubLabelClient::new()),
        Arc::new(InMemoryBlobStore::new()),
    )
    .await
    .expect("test registry/config is valid")
}

#[allow(clippy::too_many_arguments)]
fn base_alert(
    bot_id: &str,
    alert_id: &str,
    chain_id: u64,
    created_at: chrono::DateTime<Utc>,
    subject: &str,
    anomaly_score: Option<&str>,
    description: &str,
    tx_hash: &str,
) -> AlertEvent {
    let mut metadata = HashMap::new();
    if let Some(score) = anomaly_score {
        metadata.insert("anomaly_score".to_string(), score.to_string());
    }
    AlertEvent {
        alert_hash: format!("hash-{bot_id}-{alert_id}-{tx_hash}"),
        alert_id: alert_id.to_string(),
        bot_id: bot_id.to_string(),
        chain_id,
        created_at,
        description: description.to_string(),
        addresses: vec![subject.to_string()],
        metadata,
        labels: vec![],
        source: AlertSource {
            transaction_hash: tx_hash.to_string(),
            block: BlockRef { chain_id: Some(chain_id), number: 1 },
        },
    }
}

#[tokio::test]
async fn simple_critical_path_emits_tier_3() {
    let engine = new_engine(1).await;
    let now = Utc::now();
    let subject = addr("e1");

    let f1 = base_alert(FUNDING_BOT, "ALERT-FUNDING", 1, now, &subject, Some("0.001"), "d", "tx1");
    let f2 = base_alert(PREP_BOT, "ALERT-PREP", 1, now, &subject, Some("0.02"), "d", "tx2");
    let f3 = base_alert(EXPLOIT_BOT, "ALERT-EXPLOIT", 1, now, &subject, Some("0.000005"), "d", "tx3");

    assert!(engine.handle(&f1).await.unwrap().is_empty());
    assert!(engine.handle(&f2).await.unwrap().is_empty());
    let findings = engine.handle(&f3).await.unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].alert_id, "ATTACK-DETECTOR-3");
    assert!((findings[0].metadata.anomaly_score - 1e-10).abs() < 1e-12);
}

#[tokio::test]
async fn precise_bot_shortcut_emits_tier_2() {
    let engine = new_engine(1).await;
    let now = Utc::now();
    let subject = addr("e1");

    let a = base_alert(PRECISE_BOT, "ALERT-PRECISE-A", 1, now, &subject, Some("0.5"), "d", "tx1");
    let b = base_alert(PRECISE_BOT, "ALERT-PRECISE-B", 1, now, &subject, Some("0.5"), "d", "tx2");

    assert!(engine.handle(&a).await.unwrap().is_empty());
    let findings = engine.handle(&b).await.unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].alert_id, "ATTACK-DETECTOR-2");
}

#[tokio::test]
async fn l2_deployment_with_only_l1_evidence_emits_nothing() {
    let engine = new_engine(10).await;
    let now = Utc::now();
    let subject = addr("e1");

    let f1 = base_alert(FUNDING_BOT, "ALERT-FUNDING", 1, now, &subject, Some("0.001"), "d", "tx1");
    let f2 = base_alert(PREP_BOT, "ALERT-PREP", 1, now, &subject, Some("0.02"), "d", "tx2");
    let f3 = base_alert(EXPLOIT_BOT, "ALERT-EXPLOIT", 1, now, &subject, Some("0.000005"), "d", "tx3");

    assert!(engine.handle(&f1).await.unwrap().is_empty());
    assert!(engine.handle(&f2).await.unwrap().is_empty());
    assert!(engine.handle(&f3).await.unwrap().is_empty());
}

#[tokio::test]
async fn l2_deployment_with_same_chain_evidence_triggers() {
    let engine = new_engine(10).await;
    let now = Utc::now();
    let subject = addr("e1");

    let f1 = base_alert(FUNDING_BOT, "ALERT-FUNDING", 1, now, &subject, Some("0.001"), "d", "tx1");
    let f2 = base_alert(PREP_BOT, "ALERT-PREP", 1, now, &subject, Some("0.02"), "d", "tx2");
    let f3 = base_alert(EXPLOIT_BOT, "ALERT-EXPLOIT", 10, now, &subject, Some("0.000005"), "d", "tx3");

    assert!(engine.handle(&f1).await.unwrap().is_empty());
    assert!(engine.handle(&f2).await.unwrap().is_empty());
    let findings = engine.handle(&f3).await.unwrap();
    assert_eq!(findings.len(), 1);
}

#[tokio::test]
async fn cluster_merge_unifies_evidence_before_triggering() {
    let engine = new_engine(1).await;
    let now = Utc::now();
    let a1 = addr("e1");
    let a2 = addr("e2");

    let funding_on_a2 = base_alert(FUNDING_BOT, "ALERT-FUNDING", 1, now, &a2, Some("0.001"), "d", "tx1");
    let prep_on_a1 = base_alert(PREP_BOT, "ALERT-PREP", 1, now, &a1, Some("0.02"), "d", "tx2");
    assert!(engine.handle(&funding_on_a2).await.unwrap().is_empty());
    assert!(engine.handle(&prep_on_a1).await.unwrap().is_empty());

    let mut cluster_metadata = HashMap::new();
    cluster_metadata.insert("entityAddresses".to_string(), format!("{a1},{a2}"));
    let cluster_alert = AlertEvent {
        alert_hash: "cluster-hash".to_string(),
        alert_id: "ALERT-CLUSTER".to_string(),
        bot_id: CLUSTER_BOT.to_string(),
        chain_id: 1,
        created_at: now,
        description: String::new(),
        addresses: vec![],
        metadata: cluster_metadata,
        labels: vec![],
        source: AlertSource { transaction_hash: "tx-cluster".to_string(), block: BlockRef { chain_id: Some(1), number: 1 } },
    };
    assert!(engine.handle(&cluster_alert).await.unwrap().is_empty());

    let exploit_on_a1 = base_alert(EXPLOIT_BOT, "ALERT-EXPLOIT", 1, now, &a1, Some("0.000005"), "d", "tx3");
    let findings = engine.handle(&exploit_on_a1).await.unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].cluster, format!("{a1},{a2}"));
}

#[tokio::test]
async fn fp_mitigated_cluster_downgrades_to_tier_5() {
    let engine = new_engine(1).await;
    let now = Utc::now();
    let subject = addr("e1");

    let fp_alert = base_alert(FP_BOT, "ALERT-FP", 1, now, &subject, None, &format!("Mitigating {subject}"), "tx0");
    assert!(engine.handle(&fp_alert).await.unwrap().is_empty());

    let f1 = base_alert(FUNDING_BOT, "ALERT-FUNDING", 1, now, &subject, Some("0.001"), "d", "tx1");
    let f2 = base_alert(PREP_BOT, "ALERT-PREP", 1, now, &subject, Some("0.02"), "d", "tx2");
    let f3 = base_alert(EXPLOIT_BOT, "ALERT-EXPLOIT", 1, now, &subject, Some("0.000005"), "d", "tx3");
    assert!(engine.handle(&f1).await.unwrap().is_empty());
    assert!(engine.handle(&f2).await.unwrap().is_empty());
    let findings = engine.handle(&f3).await.unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].alert_id, "ATTACK-DETECTOR-5");
    assert_eq!(findings[0].severity, aegis_domain_models::Severity::Info);
}

#[tokio::test]
async fn end_user_attack_downgrades_to_tier_6() {
    let engine = new_engine(1).await;
    let now = Utc::now();
    let subject = addr("e1");

    let mut rug_pull_metadata = HashMap::new();
    rug_pull_metadata.insert("attacker_deployer_address".to_string(), subject.clone());
    let rug_pull_alert = AlertEvent {
        alert_hash: "rug-pull-hash".to_string(),
        alert_id: "HARD-RUG-PULL-1".to_string(),
        bot_id: HARD_RUG_PULL_BOT_ID.to_string(),
        chain_id: 1,
        created_at: now,
        description: String::new(),
        addresses: vec![],
        metadata: rug_pull_metadata,
        labels: vec![],
        source: AlertSource { transaction_hash: "tx-rug".to_string(), block: BlockRef { chain_id: Some(1), number: 1 } },
    };
    assert!(engine.handle(&rug_pull_alert).await.unwrap().is_empty());

    let f1 = base_alert(FUNDING_BOT, "ALERT-FUNDING", 1, now, &subject, Some("0.001"), "d", "tx1");
    let f2 = base_alert(PREP_BOT, "ALERT-PREP", 1, now, &subject, Some("0.02"), "d", "tx2");
    let f3 = base_alert(EXPLOIT_BOT, "ALERT-EXPLOIT", 1, now, &subject, Some("0.000005"), "d", "tx3");
    assert!(engine.handle(&f1).await.unwrap().is_empty());
    assert!(engine.handle(&f2).await.unwrap().is_empty());
    let findings = engine.handle(&f3).await.unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].alert_id, "ATTACK-DETECTOR-6");
}

#[tokio::test]
async fn missing_anomaly_score_falls_back_to_default_and_still_emits() {
    let engine = new_engine(1).await;
    let now = Utc::now();
    let subject = addr("e1");

    let f1 = base_alert(FUNDING_BOT, "ALERT-FUNDING", 1, now, &subject, Some("0.001"), "d", "tx1");
    let f2 = base_alert(PREP_BOT, "ALERT-PREP", 1, now, &subject, None, "d", "tx2");
    let f3 = base_alert(EXPLOIT_BOT, "ALERT-EXPLOIT", 1, now, &subject, Some("0.000005"), "d", "tx3");
    assert!(engine.handle(&f1).await.unwrap().is_empty());
    assert!(engine.handle(&f2).await.unwrap().is_empty());
    let findings = engine.handle(&f3).await.unwrap();

    assert_eq!(findings.len(), 1);
    let expected = 0.001 * engine.config().default_anomaly_score * 0.000005;
    assert!((findings[0].metadata.anomaly_score - expected).abs() < 1e-12);
}

#[tokio::test]
async fn too_old_funding_alert_is_pruned_and_no_finding_emits() {
    let engine = new_engine(1).await;
    let now = Utc::now();
    let subject = addr("e1");

    let stale_funding = base_alert(FUNDING_BOT, "ALERT-FUNDING", 1, now - Duration::hours(30), &subject, Some("0.001"), "d", "tx1");
    let f2 = base_alert(PREP_BOT, "ALERT-PREP", 1, now, &subject, Some("0.02"), "d", "tx2");
    let f3 = base_alert(EXPLOIT_BOT, "ALERT-EXPLOIT", 1, now, &subject, Some("0.000005"), "d", "tx3");

    assert!(engine.handle(&stale_funding).await.unwrap().is_empty());
    assert!(engine.handle(&f2).await.unwrap().is_empty());
    assert!(engine.handle(&f3).await.unwrap().is_empty());
}

#[tokio::test]
async fn contract_subject_never_emits() {
    let subject = addr("e1");
    let mut contracts = std::collections::HashSet::new();
    contracts.insert(subject.clone());
    let chain_client = Arc::new(StubChainClient { contracts, validator_by_block: Default::default() });

    let engine = CorrelationEngine::initialize(
        EngineConfig::new(1, false),
        test_registry(),
        chain_client,
        Arc::new(StubLabelClient::new()),
        Arc::new(InMemoryBlobStore::new()),
    )
    .await
    .expect("test registry/config is valid");

    let now = Utc::now();
    let f1 = base_alert(FUNDING_BOT, "ALERT-FUNDING", 1, now, &subject, Some("0.001"), "d", "tx1");
    let f2 = base_alert(PREP_BOT, "ALERT-PREP", 1, now, &subject, Some("0.02"), "d", "tx2");
    let f3 = base_alert(EXPLOIT_BOT, "ALERT-EXPLOIT", 1, now, &subject, Some("0.000005"), "d", "tx3");

    assert!(engine.handle(&f1).await.unwrap().is_empty());
    assert!(engine.handle(&f2).await.unwrap().is_empty());
    assert!(engine.handle(&f3).await.unwrap().is_empty());
}

#[tokio::test]
async fn a_tier_is_emitted_at_most_once_per_cluster() {
    let engine = new_engine(1).await;
    let now = Utc::now();
    let subject = addr("e1");

    let f1 = base_alert(FUNDING_BOT, "ALERT-FUNDING", 1, now, &subject, Some("0.001"), "d", "tx1");
    let f2 = base_alert(PREP_BOT, "ALERT-PREP", 1, now, &subject, Some("0.02"), "d", "tx2");
    let f3 = base_alert(EXPLOIT_BOT, "ALERT-EXPLOIT", 1, now, &subject, Some("0.000005"), "d", "tx3");
    assert!(engine.handle(&f1).await.unwrap().is_empty());
    assert!(engine.handle(&f2).await.unwrap().is_empty());
    assert_eq!(engine.handle(&f3).await.unwrap().len(), 1);

    // Re-sending the same triggering alert must not re-emit the same tier.
    assert!(engine.handle(&f3).await.unwrap().is_empty());
}

#[tokio::test]
async fn wrong_chain_alert_is_rejected() {
    let engine = new_engine(1).await;
    let now = Utc::now();
    let subject = addr("e1");
    let wrong_chain = base_alert(FUNDING_BOT, "ALERT-FUNDING", 99, now, &subject, Some("0.001"), "d", "tx1");
    assert!(engine.handle(&wrong_chain).await.is_err());
}
