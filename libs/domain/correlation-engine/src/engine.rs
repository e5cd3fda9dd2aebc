// [libs/domain/correlation-engine/src/engine.rs]
//! The top-level correlation engine: owns the five in-memory stores behind
//! one lock, wires the pluggable external clients, and drives dispatch and
//! periodic persistence.

use crate::config::{EngineConfig, SUPPORTED_CHAIN_IDS};
use crate::dispatcher::{self, EngineState};
use crate::error::EngineError;
use crate::persistor;
use crate::registry::{BotRegistry, Subscription};
use aegis_chain_client::ChainClient;
use aegis_domain_models::{AlertEvent, Finding};
use aegis_label_client::LabelClient;
use aegis_state_store::BlobStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

/// The engine assumes alerts are delivered one at a time (single-logical-
/// consumer): this lock is held across the external-client awaits inside
/// dispatch, so cluster migration stays atomic with respect to decisions.
pub struct CorrelationEngine {
    config: EngineConfig,
    registry: BotRegistry,
    state: Mutex<EngineState>,
    chain_client: Arc<dyn ChainClient>,
    label_client: Arc<dyn LabelClient>,
    blob_store: Arc<dyn BlobStore>,
}

impl CorrelationEngine {
    /// Restores state from `blob_store` if present, else starts empty.
    /// Fails fast on a configuration error (unknown chain, or a registry
    /// with no subscriptions for this chain) — these never recover at
    /// runtime, so they are rejected before any state is touched.
    pub async fn initialize(
        config: EngineConfig,
        registry: BotRegistry,
        chain_client: Arc<dyn ChainClient>,
        label_client: Arc<dyn LabelClient>,
        blob_store: Arc<dyn BlobStore>,
    ) -> Result<Self, EngineError> {
        validate_configuration(&config, &registry)?;

        let fresh = EngineState::new(&config);
        let restored = persistor::restore(fresh, blob_store.as_ref(), config.chain_id).await;
        Ok(Self {
            config,
            registry,
            state: Mutex::new(restored),
            chain_client,
            label_client,
            blob_store,
        })
    }

    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.registry.subscriptions(self.config.chain_id)
    }

    /// Handles one inbound alert. Rejects an alert on the wrong chain per
    /// the subscription contract; any other unexpected failure during
    /// dispatch is the caller's concern to classify as production-mode
    /// re-raise vs. swallow (dispatch itself never panics on expected
    /// inputs — only external I/O faults, already absorbed as "no
    /// evidence").
    #[instrument(skip(self, alert), fields(alert_hash = %alert.alert_hash))]
    pub async fn handle(&self, alert: &AlertEvent) -> Result<Vec<Finding>, EngineError> {
        dispatcher::validate_chain(alert, &self.config)?;

        let findings = {
            let mut state = self.state.lock().await;
            dispatcher::dispatch(alert, &mut state, &self.registry, &self.config, self.chain_client.as_ref(), self.label_client.as_ref()).await
        };

        if !self.config.production {
            self.persist_snapshot().await;
        }

        Ok(findings)
    }

    /// Snapshots all stores to the blob store. Called on a timer in
    /// production, and synchronously after every alert otherwise.
    pub async fn persist_snapshot(&self) {
        let state = self.state.lock().await;
        persistor::snapshot(&state, self.blob_store.as_ref(), self.config.chain_id).await;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Configuration error (unknown chain, missing registry entry): fatal at
/// init, per the engine's error-handling contract.
fn validate_configuration(config: &EngineConfig, registry: &BotRegistry) -> Result<(), EngineError> {
    if !SUPPORTED_CHAIN_IDS.contains(&config.chain_id) {
        return Err(EngineError::Configuration(format!(
            "chain_id {} is not among the chains this engine supports ({:?})",
            config.chain_id, SUPPORTED_CHAIN_IDS
        )));
    }
    if registry.has_no_base_bots() {
        return Err(EngineError::Configuration(
            "bot registry has no base-bot entries, so it would never produce a finding".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BotRegistry;

    #[test]
    fn rejects_unsupported_chain_id() {
        let config = EngineConfig::new(999, false);
        let registry = BotRegistry::default_registry();
        let err = validate_configuration(&config, &registry).unwrap_err();
        assert!(matches!(err, EngineError::Configuration(_)));
    }

    #[test]
    fn rejects_registry_with_no_base_bots() {
        let config = EngineConfig::new(1, false);
        let registry = BotRegistry::new(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            String::new(),
            (String::new(), String::new()),
        );
        let err = validate_configuration(&config, &registry).unwrap_err();
        assert!(matches!(err, EngineError::Configuration(_)));
    }

    #[test]
    fn accepts_default_registry_on_a_supported_chain() {
        let config = EngineConfig::new(1, false);
        let registry = BotRegistry::default_registry();
        assert!(validate_configuration(&config, &registry).is_ok());
    }
}
