// [libs/domain/correlation-engine/src/persistor.rs]
//! C12 — Persistor: snapshots engine state to the configured blob store and
//! restores it at startup. Runs on a periodic tick and, outside production
//! mode, synchronously after every alert for dev durability.

use crate::dispatcher::EngineState;
use aegis_state_store::{keys, BlobStore};
use tracing::{error, info, warn};

async fn persist_one<T: serde::Serialize>(store: &dyn BlobStore, chain_id: u64, key: &str, value: &T) {
    match serde_json::to_vec(value) {
        Ok(bytes) => {
            if let Err(e) = store.put(chain_id, key, bytes).await {
                error!(key, error = %e, "snapshot persist failed, will retry next cycle");
            }
        }
        Err(e) => error!(key, error = %e, "snapshot encode failed"),
    }
}

/// Serializes every engine-owned store under its well-known key.
pub async fn snapshot(state: &EngineState, store: &dyn BlobStore, chain_id: u64) {
    persist_one(store, chain_id, keys::ENTITY_CLUSTERS, &state.clusters).await;
    persist_one(store, chain_id, keys::ALERTS, &state.alerts).await;
    persist_one(store, chain_id, keys::CONTEXT, &state.context).await;
    persist_one(store, chain_id, keys::FP_MITIGATION_CLUSTERS, &state.suppression.fp_mitigation_clusters).await;
    persist_one(store, chain_id, keys::END_USER_ATTACK_CLUSTERS, &state.suppression.end_user_attack_clusters).await;
    persist_one(store, chain_id, keys::ALERTED_CLUSTERS_STRICT, &state.suppression.alerted_strict).await;
    persist_one(store, chain_id, keys::ALERTED_CLUSTERS_LOOSE, &state.suppression.alerted_loose).await;
    persist_one(store, chain_id, keys::ALERTED_CLUSTERS_FP_MITIGATED, &state.suppression.alerted_fp_mitigated).await;
    info!("state snapshot complete");
}

async fn load_one<T: for<'de> serde::Deserialize<'de>>(store: &dyn BlobStore, chain_id: u64, key: &str, fallback: T) -> T {
    match store.get(chain_id, key).await {
        Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "snapshot decode failed, starting this store empty");
                fallback
            }
        },
        Ok(None) => fallback,
        Err(e) => {
            warn!(key, error = %e, "snapshot load failed, starting this store empty");
            fallback
        }
    }
}

/// Restores engine state from the blob store, falling back to an empty
/// store for any key that is absent or fails to decode.
pub async fn restore(mut state: EngineState, store: &dyn BlobStore, chain_id: u64) -> EngineState {
    state.clusters = load_one(store, chain_id, keys::ENTITY_CLUSTERS, state.clusters).await;
    state.alerts = load_one(store, chain_id, keys::ALERTS, state.alerts).await;
    state.context = load_one(store, chain_id, keys::CONTEXT, state.context).await;
    state.suppression.fp_mitigation_clusters =
        load_one(store, chain_id, keys::FP_MITIGATION_CLUSTERS, state.suppression.fp_mitigation_clusters).await;
    state.suppression.end_user_attack_clusters =
        load_one(store, chain_id, keys::END_USER_ATTACK_CLUSTERS, state.suppression.end_user_attack_clusters).await;
    state.suppression.alerted_strict =
        load_one(store, chain_id, keys::ALERTED_CLUSTERS_STRICT, state.suppression.alerted_strict).await;
    state.suppression.alerted_loose =
        load_one(store, chain_id, keys::ALERTED_CLUSTERS_LOOSE, state.suppression.alerted_loose).await;
    state.suppression.alerted_fp_mitigated =
        load_one(store, chain_id, keys::ALERTED_CLUSTERS_FP_MITIGATED, state.suppression.alerted_fp_mitigated).await;
    info!("state restore complete");
    state
}
