// INICIO DEL ARCHIVO [libs/infra/state-store/src/lib.rs]
/*!
 * =================================================================
 * APARATO: STATE STORE (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L4)
 * RESPONSABILIDAD: PERSISTENCIA DE BLOBS OPACOS POR CADENA
 *
 * Contrato mínimo de get/put usado por el persistor del motor para
 * sobrevivir reinicios: cada valor es un blob opaco (el motor decide
 * la codificación), con cada clave cualificada por chain id.
 * =================================================================
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum StateStoreError {
    #[error("IO_FAULT: {0}")]
    Io(#[from] std::io::Error),
}

/// Keyed get/put of opaque serialized state, namespaced per chain. A load
/// failure must never be treated as fatal by callers — it means "start
/// empty", which is why `get` returns `Option` rather than propagating
/// "not found" as an error.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, chain_id: u64, key: &str) -> Result<Option<Vec<u8>>, StateStoreError>;
    async fn put(&self, chain_id: u64, key: &str, value: Vec<u8>) -> Result<(), StateStoreError>;
}

fn namespaced_key(chain_id: u64, key: &str) -> String {
    format!("{chain_id}:{key}")
}

/// Volatile backend, used by tests and by a fresh process with nothing to
/// restore from yet.
#[derive(Default)]
pub struct InMemoryBlobStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn get(&self, chain_id: u64, key: &str) -> Result<Option<Vec<u8>>, StateStoreError> {
        let values = self.values.lock().expect("state store lock poisoned");
        Ok(values.get(&namespaced_key(chain_id, key)).cloned())
    }

    async fn put(&self, chain_id: u64, key: &str, value: Vec<u8>) -> Result<(), StateStoreError> {
        let mut values = self.values.lock().expect("state store lock poisoned");
        values.insert(namespaced_key(chain_id, key), value);
        Ok(())
    }
}

/// File-per-key backend for local/dev durability: one file under
/// `root_dir`, named after the namespaced key. Stands in for whatever
/// keyed blob store a real deployment fronts this trait with.
pub struct FileBlobStore {
    root_dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    fn path_for(&self, chain_id: u64, key: &str) -> PathBuf {
        self.root_dir.join(format!("{}.blob", namespaced_key(chain_id, key)))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn get(&self, chain_id: u64, key: &str) -> Result<Option<Vec<u8>>, StateStoreError> {
        let path = self.path_for(chain_id, key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                warn!("state store load failed for {:?}: {e}. Treating as empty.", path);
                Ok(None)
            }
        }
    }

    async fn put(&self, chain_id: u64, key: &str, value: Vec<u8>) -> Result<(), StateStoreError> {
        if let Err(e) = tokio::fs::create_dir_all(&self.root_dir).await {
            error!("state store directory creation failed: {e}");
            return Err(e.into());
        }
        let path = self.path_for(chain_id, key);
        tokio::fs::write(&path, value).await.map_err(|e| {
            error!("state store persist failed for {:?}: {e}", path);
            e.into()
        })
    }
}

/// Well-known keys the engine snapshots, matching the persisted state
/// layout of the original bot.
pub mod keys {
    pub const ALERTS: &str = "alerts";
    pub const ENTITY_CLUSTERS: &str = "entity_clusters";
    pub const FP_MITIGATION_CLUSTERS: &str = "fp_mitigation_clusters";
    pub const END_USER_ATTACK_CLUSTERS: &str = "end_user_attack_clusters";
    pub const CONTEXT: &str = "context";
    pub const ALERTED_CLUSTERS_STRICT: &str = "alerted_clusters_strict";
    pub const ALERTED_CLUSTERS_LOOSE: &str = "alerted_clusters_loose";
    pub const ALERTED_CLUSTERS_FP_MITIGATED: &str = "alerted_clusters_fp_mitigated";
}
// FIN DEL ARCHIVO [libs/infra/state-store/src/lib.rs]
