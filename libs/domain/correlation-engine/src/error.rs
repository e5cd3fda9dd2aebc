// [libs/domain/correlation-engine/src/error.rs]
//! Engine-level error kinds. External-lookup and upstream-decode faults are
//! deliberately NOT represented here: the design requires they be swallowed
//! at the point of use and treated as absence of evidence, never bubbled up
//! as a handling failure.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("CONFIGURATION_FAULT: {0}")]
    Configuration(String),

    #[error("WRONG_CHAIN_ALERT: alert for chain {alert_chain} received by engine configured for chain {engine_chain}")]
    WrongChainAlert { alert_chain: u64, engine_chain: u64 },

    #[error("STATE_STORE_FAULT: {0}")]
    StateStore(#[from] aegis_state_store::StateStoreError),
}
