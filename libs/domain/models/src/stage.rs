// [libs/domain/models/src/stage.rs]
//! Kill-chain stage a contributing detector maps to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One phase of the attack kill-chain. Ordered so a `BTreeMap<Stage, _>`
/// produces a deterministic stage table in findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Funding,
    MoneyLaundering,
    Preparation,
    Exploitation,
}

impl Stage {
    /// All four stages, in the canonical order used for `|distinctStages| = 4` checks.
    pub const ALL: [Stage; 4] = [
        Stage::Funding,
        Stage::MoneyLaundering,
        Stage::Preparation,
        Stage::Exploitation,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Funding => "Funding",
            Stage::MoneyLaundering => "MoneyLaundering",
            Stage::Preparation => "Preparation",
            Stage::Exploitation => "Exploitation",
        };
        write!(f, "{label}")
    }
}
