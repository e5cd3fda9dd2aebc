// INICIO DEL ARCHIVO [libs/infra/label-client/src/lib.rs]
/*!
 * =================================================================
 * APARATO: LABEL CLIENT (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L4)
 * RESPONSABILIDAD: CONSULTA DE ETIQUETAS DE REPUTACIÓN EXTERNA
 *
 * Resuelve la etiqueta de reputación más reciente de una dirección desde
 * un servicio externo de labeling. Ausencia de etiqueta se trata siempre
 * como cadena vacía, nunca como evidencia de inocencia o culpabilidad.
 * =================================================================
 */

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelClientError {
    #[error("NETWORK_UNREACHABLE: {0}")]
    Network(#[from] reqwest::Error),
    #[error("PROVIDER_REJECTION: status {0}")]
    ProviderRejection(u16),
}

#[async_trait]
pub trait LabelClient: Send + Sync {
    /// Returns the empty string when no label is known for `address`.
    async fn lookup_label(&self, address: &str) -> Result<String, LabelClientError>;
}

#[derive(Debug, Deserialize)]
struct LabelStateResponse {
    events: Vec<LabelEvent>,
}

#[derive(Debug, Deserialize)]
struct LabelEvent {
    label: LabelBody,
}

#[derive(Debug, Deserialize)]
struct LabelBody {
    label: String,
}

/// HTTP implementation against the reputation-label lookup service.
pub struct HttpLabelClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpLabelClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("failed to build label-client http session"),
            base_url,
        }
    }
}

#[async_trait]
impl LabelClient for HttpLabelClient {
    async fn lookup_label(&self, address: &str) -> Result<String, LabelClientError> {
        let url = format!("{}{}", self.base_url, address.to_lowercase());
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(LabelClientError::ProviderRejection(response.status().as_u16()));
        }

        let parsed: Result<LabelStateResponse, _> = response.json().await;
        match parsed {
            Ok(state) => Ok(state
                .events
                .first()
                .map(|e| e.label.label.clone())
                .unwrap_or_default()),
            Err(_) => Ok(String::new()),
        }
    }
}

/// Deterministic stand-in for tests.
pub struct StubLabelClient {
    pub labels: std::collections::HashMap<String, String>,
}

impl StubLabelClient {
    pub fn new() -> Self {
        Self {
            labels: Default::default(),
        }
    }
}

impl Default for StubLabelClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LabelClient for StubLabelClient {
    async fn lookup_label(&self, address: &str) -> Result<String, LabelClientError> {
        Ok(self.labels.get(address).cloned().unwrap_or_default())
    }
}
// FIN DEL ARCHIVO [libs/infra/label-client/src/lib.rs]
