// [libs/domain/correlation-engine/src/registry.rs]
//! C4 — Bot Registry: immutable configuration loaded at startup, enumerating
//! which upstream bots feed which part of the correlation pipeline.

use aegis_domain_models::Stage;
use std::collections::{HashMap, HashSet};

/// One base-bot triple: the (bot, alert) pair and the kill-chain stage its
/// alerts contribute to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseBot {
    pub bot_id: String,
    pub alert_id: String,
    pub stage: Stage,
}

/// A subscription triple the engine asks the alert bus for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub bot_id: String,
    pub alert_id: Option<String>,
    pub chain_id: u64,
}

/// Immutable bot configuration: base bots, highly-precise bots, FP
/// mitigation bots, end-user-attack bots, context bots, and the single
/// entity-cluster bot.
#[derive(Debug, Clone)]
pub struct BotRegistry {
    base_bots: Vec<BaseBot>,
    stage_map: HashMap<(String, String), Stage>,
    highly_precise: HashSet<(String, String)>,
    fp_mitigation_bots: HashSet<(String, String)>,
    end_user_attack_bots: HashSet<String>,
    context_bots: HashSet<String>,
    victim_context_bot: String,
    entity_cluster_bot: (String, String),
}

impl BotRegistry {
    pub fn new(
        base_bots: Vec<BaseBot>,
        highly_precise: Vec<(String, String)>,
        fp_mitigation_bots: Vec<(String, String)>,
        end_user_attack_bots: Vec<String>,
        context_bots: Vec<String>,
        victim_context_bot: String,
        entity_cluster_bot: (String, String),
    ) -> Self {
        let stage_map = base_bots
            .iter()
            .map(|b| ((b.bot_id.clone(), b.alert_id.clone()), b.stage))
            .collect();
        Self {
            base_bots,
            stage_map,
            highly_precise: highly_precise.into_iter().collect(),
            fp_mitigation_bots: fp_mitigation_bots.into_iter().collect(),
            end_user_attack_bots: end_user_attack_bots.into_iter().collect(),
            context_bots: context_bots.into_iter().collect(),
            victim_context_bot,
            entity_cluster_bot,
        }
    }

    /// The roster this deployment ships by default, grounded in the base
    /// bot list, FP mitigation bots, and entity-cluster bot of the upstream
    /// scam-detection stack this engine consolidates.
    pub fn default_registry() -> Self {
        let base_bots = vec![
            BaseBot { bot_id: "0xd9584a587a469f3cdd8a03ffccb14114bc78485657e28739b8036aee7782df5c".into(), alert_id: "SEAPORT-PHISHING-TRANSFER".into(), stage: Stage::Exploitation },
            BaseBot { bot_id: "0x8badbf2ad65abc3df5b1d9cc388e419d9255ef999fb69aac6bf395646cf01c14".into(), alert_id: "ICE-PHISHING-HIGH-NUM-APPROVED-TRANSFERS".into(), stage: Stage::Exploitation },
            BaseBot { bot_id: "0x8badbf2ad65abc3df5b1d9cc388e419d9255ef999fb69aac6bf395646cf01c14".into(), alert_id: "ICE-PHISHING-PERMITTED-ERC20-TRANSFER".into(), stage: Stage::Preparation },
            BaseBot { bot_id: "0x8badbf2ad65abc3df5b1d9cc388e419d9255ef999fb69aac6bf395646cf01c14".into(), alert_id: "ICE-PHISHING-SUSPICIOUS-TRANSFER".into(), stage: Stage::Preparation },
            BaseBot { bot_id: "0x8badbf2ad65abc3df5b1d9cc388e419d9255ef999fb69aac6bf395646cf01c14".into(), alert_id: "ICE-PHISHING-HIGH-NUM-ERC20-APPROVALS".into(), stage: Stage::Preparation },
            BaseBot { bot_id: "0x8badbf2ad65abc3df5b1d9cc388e419d9255ef999fb69aac6bf395646cf01c14".into(), alert_id: "ICE-PHISHING-HIGH-NUM-ERC721-APPROVALS".into(), stage: Stage::Preparation },
            BaseBot { bot_id: "0x8badbf2ad65abc3df5b1d9cc388e419d9255ef999fb69aac6bf395646cf01c14".into(), alert_id: "ICE-PHISHING-ERC20-APPROVAL-FOR-ALL".into(), stage: Stage::Preparation },
            BaseBot { bot_id: "0x8badbf2ad65abc3df5b1d9cc388e419d9255ef999fb69aac6bf395646cf01c14".into(), alert_id: "ICE-PHISHING-ERC721-APPROVAL-FOR-ALL".into(), stage: Stage::Preparation },
            BaseBot { bot_id: "0x8badbf2ad65abc3df5b1d9cc388e419d9255ef999fb69aac6bf395646cf01c14".into(), alert_id: "ICE-PHISHING-ERC1155-APPROVAL-FOR-ALL".into(), stage: Stage::Preparation },
            BaseBot { bot_id: "0x8badbf2ad65abc3df5b1d9cc388e419d9255ef999fb69aac6bf395646cf01c14".into(), alert_id: "ICE-PHISHING-ERC20-SCAM-PERMIT".into(), stage: Stage::Preparation },
            BaseBot { bot_id: "0x8badbf2ad65abc3df5b1d9cc388e419d9255ef999fb69aac6bf395646cf01c14".into(), alert_id: "ICE-PHISHING-ERC20-SCAM-CREATOR-PERMIT".into(), stage: Stage::Preparation },
            BaseBot { bot_id: "0x8badbf2ad65abc3df5b1d9cc388e419d9255ef999fb69aac6bf395646cf01c14".into(), alert_id: "ICE-PHISHING-SCAM-APPROVAL".into(), stage: Stage::Preparation },
            BaseBot { bot_id: "0x8badbf2ad65abc3df5b1d9cc388e419d9255ef999fb69aac6bf395646cf01c14".into(), alert_id: "ICE-PHISHING-SCAM-CREATOR-APPROVAL".into(), stage: Stage::Preparation },
            BaseBot { bot_id: "0x8badbf2ad65abc3df5b1d9cc388e419d9255ef999fb69aac6bf395646cf01c14".into(), alert_id: "ICE-PHISHING-SCAM-TRANSFER".into(), stage: Stage::Preparation },
            BaseBot { bot_id: "0x8badbf2ad65abc3df5b1d9cc388e419d9255ef999fb69aac6bf395646cf01c14".into(), alert_id: "ICE-PHISHING-SCAM-CREATOR-TRANSFER".into(), stage: Stage::Preparation },
            BaseBot { bot_id: "0xa91a31df513afff32b9d85a2c2b7e786fdd681b3cdd8d93d6074943ba31ae400".into(), alert_id: "FUNDING-TORNADO-CASH".into(), stage: Stage::Funding },
            BaseBot { bot_id: "0x617c356a4ad4b755035ef8024a87d36d895ee3cb0864e7ce9b3cf694dd80c82a".into(), alert_id: "TORNADO-CASH-FUNDED-ACCOUNT-INTERACTION".into(), stage: Stage::Preparation },
            BaseBot { bot_id: "0x4adff9a0ed29396d51ef3b16297070347aab25575f04a4e2bd62ec43ca4508d2".into(), alert_id: "POSSIBLE-MONEY-LAUNDERING-TORNADO-CASH".into(), stage: Stage::MoneyLaundering },
            BaseBot { bot_id: "0x11b3d9ffb13a72b776e1aed26616714d879c481d7a463020506d1fb5f33ec1d4".into(), alert_id: "forta-text-messages-possible-hack".into(), stage: Stage::MoneyLaundering },
            BaseBot { bot_id: "0xbc06a40c341aa1acc139c900fd1b7e3999d71b80c13a9dd50a369d8f923757f5".into(), alert_id: "FLASHBOT-TRANSACTION".into(), stage: Stage::Exploitation },
            BaseBot { bot_id: "0x4c7e56a9a753e29ca92bd57dd593bdab0c03e762bdd04e2bc578cb82b842c1f3".into(), alert_id: "UNVERIFIED-CODE-CONTRACT-CREATION".into(), stage: Stage::Preparation },
            BaseBot { bot_id: "0xd935a697faab13282b3778b2cb8dd0aa4a0dde07877f9425f3bf25ac7b90b895".into(), alert_id: "AE-MALICIOUS-ADDR".into(), stage: Stage::Exploitation },
            BaseBot { bot_id: "0x33faef3222e700774af27d0b71076bfa26b8e7c841deb5fb10872a78d1883dba".into(), alert_id: "SLEEPMINT-3".into(), stage: Stage::Preparation },
            BaseBot { bot_id: "0xf496e3f522ec18ed9be97b815d94ef6a92215fc8e9a1a16338aee9603a5035fb".into(), alert_id: "CEX-FUNDING-1".into(), stage: Stage::Funding },
            BaseBot { bot_id: "0x47b86137077e18a093653990e80cb887be98e7445291d8cf811d3b2932a3c4d2".into(), alert_id: "AK-AZTEC-PROTOCOL-DEPOSIT-EVENT".into(), stage: Stage::MoneyLaundering },
            BaseBot { bot_id: "0xdba64bc69511d102162914ef52441275e651f817e297276966be16aeffe013b0".into(), alert_id: "UMBRA-RECEIVE".into(), stage: Stage::Funding },
            BaseBot { bot_id: "0x2df302b07030b5ff8a17c91f36b08f9e2b1e54853094e2513f7cda734cf68a46".into(), alert_id: "MALICIOUS-ACCOUNT-FUNDING".into(), stage: Stage::Funding },
            BaseBot { bot_id: "0x9324d7865e1bcb933c19825be8482e995af75c9aeab7547631db4d2cd3522e0e".into(), alert_id: "FUNDING-CHANGENOW-NEW-ACCOUNT".into(), stage: Stage::Funding },
            BaseBot { bot_id: "0x887678a85e645ad060b2f096812f7c71e3d20ed6ecf5f3acde6e71baa4cf86ad".into(), alert_id: "SUSPICIOUS-TOKEN-CONTRACT-CREATION".into(), stage: Stage::Preparation },
        ];

        let highly_precise = vec![
            ("0xd935a697faab13282b3778b2cb8dd0aa4a0dde07877f9425f3bf25ac7b90b895".to_string(), "AE-MALICIOUS-ADDR".to_string()),
            ("0xd9584a587a469f3cdd8a03ffccb14114bc78485657e28739b8036aee7782df5c".to_string(), "SEAPORT-PHISHING-TRANSFER".to_string()),
        ];

        let fp_mitigation_bots = vec![
            ("0xabdeff7672e59d53c7702777652e318ada644698a9faf2e7f608ec846b07325b".to_string(), "MEV-ACCOUNT".to_string()),
            ("0xa91a31df513afff32b9d85a2c2b7e786fdd681b3cdd8d93d6074943ba31ae400".to_string(), "FUNDING-TORNADO-CASH-HIGH".to_string()),
            ("0xd6e19ec6dc98b13ebb5ec24742510845779d9caf439cadec9a5533f8394d435f".to_string(), "POSITIVE-REPUTATION-1".to_string()),
            ("0xe04b3fa79bd6bc6168a211bcec5e9ac37d5dd67a41a1884aa6719f8952fbc274".to_string(), "VICTIM-NOTIFICATION-1".to_string()),
        ];

        let end_user_attack_bots = vec![
            "0xc608f1aff80657091ad14d974ea37607f6e7513fdb8afaa148b3bff5ba305c15".to_string(), // hard-rug-pull
            "0xf234f56095ba6c4c4782045f6d8e95d22da360bdc41b75c0549e2713a93231a4".to_string(), // soft-rug-pull
            "0x36be2983e82680996e6ccc2ab39a506444ab7074677e973136fa8d914fc5dd11".to_string(), // rake-token-contract
        ];

        let victim_context_bot = "0x441d3228a68bbbcf04e6813f52306efcaf1e66f275d682e62499f44905215250".to_string();
        let profit_context_bot = "0x7cfeb792e705a82e984194e1e8d0e9ac3aa48ad8f6530d3017b1e2114d3519ac".to_string(); // large-profit
        let context_bots = vec![victim_context_bot.clone(), profit_context_bot];

        let entity_cluster_bot = (
            "0xd3061db4662d5b3406b52b20f34234e462d2c275b99414d76dc644e2486be3e9".to_string(),
            "ENTITY-CLUSTER".to_string(),
        );

        Self::new(
            base_bots,
            highly_precise,
            fp_mitigation_bots,
            end_user_attack_bots,
            context_bots,
            victim_context_bot,
            entity_cluster_bot,
        )
    }

    pub fn is_entity_cluster_alert(&self, bot_id: &str, alert_id: &str) -> bool {
        self.entity_cluster_bot.0 == bot_id && self.entity_cluster_bot.1 == alert_id
    }

    pub fn is_context_bot(&self, bot_id: &str) -> bool {
        self.context_bots.contains(bot_id)
    }

    pub fn is_victim_bot(&self, bot_id: &str) -> bool {
        self.victim_context_bot == bot_id
    }

    pub fn is_fp_mitigation_alert(&self, bot_id: &str, alert_id: &str) -> bool {
        self.fp_mitigation_bots.contains(&(bot_id.to_string(), alert_id.to_string()))
    }

    pub fn is_end_user_bot(&self, bot_id: &str) -> bool {
        self.end_user_attack_bots.contains(bot_id)
    }

    pub fn stage_for(&self, bot_id: &str, alert_id: &str) -> Option<Stage> {
        self.stage_map.get(&(bot_id.to_string(), alert_id.to_string())).copied()
    }

    pub fn is_highly_precise(&self, bot_id: &str, alert_id: &str) -> bool {
        self.highly_precise.contains(&(bot_id.to_string(), alert_id.to_string()))
    }

    /// True if this registry carries no base-bot entries at all, meaning it
    /// would never produce a finding for any chain — a degenerate
    /// configuration, not a legitimate empty deployment.
    pub fn has_no_base_bots(&self) -> bool {
        self.base_bots.is_empty()
    }

    /// The subscription set this deployment wants from the bus, including
    /// the L1 fan-in duplication for L2 deployments (chain 10, 42161).
    pub fn subscriptions(&self, chain_id: u64) -> Vec<Subscription> {
        let mut subs = Vec::new();
        let is_l2 = matches!(chain_id, 10 | 42161);

        let push_pair = |subs: &mut Vec<Subscription>, bot_id: &str, alert_id: Option<&str>| {
            subs.push(Subscription { bot_id: bot_id.to_string(), alert_id: alert_id.map(str::to_string), chain_id });
            if is_l2 {
                subs.push(Subscription { bot_id: bot_id.to_string(), alert_id: alert_id.map(str::to_string), chain_id: 1 });
            }
        };

        for b in &self.base_bots {
            push_pair(&mut subs, &b.bot_id, Some(&b.alert_id));
        }
        for (bot_id, alert_id) in &self.fp_mitigation_bots {
            push_pair(&mut subs, bot_id, Some(alert_id));
        }
        for bot_id in &self.end_user_attack_bots {
            push_pair(&mut subs, bot_id, None);
        }
        for bot_id in &self.context_bots {
            push_pair(&mut subs, bot_id, None);
        }
        push_pair(&mut subs, &self.entity_cluster_bot.0, Some(&self.entity_cluster_bot.1));

        subs
    }
}

impl Default for BotRegistry {
    fn default() -> Self {
        Self::default_registry()
    }
}
