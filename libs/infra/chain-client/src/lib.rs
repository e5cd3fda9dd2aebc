// INICIO DEL ARCHIVO [libs/infra/chain-client/src/lib.rs]
/*!
 * =================================================================
 * APARATO: CHAIN CLIENT (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L4)
 * RESPONSABILIDAD: VERDAD ON-CHAIN PARA LA MITIGACIÓN DE FALSOS POSITIVOS
 *
 * Implementa el contrato `ChainClient` consumido por el motor de
 * correlación: comprobación de código de contrato (EOA vs contrato) y el
 * heurístico de validador de Polygon a partir de los recibos de bloque.
 * =================================================================
 */

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainClientError {
    #[error("NETWORK_UNREACHABLE: {0}")]
    Network(#[from] reqwest::Error),
    #[error("RPC_FAULT: node returned error {0}")]
    RpcFault(String),
    #[error("DECODE_FAULT: {0}")]
    Decode(String),
}

/// On-chain facts the decision engine consults, but never the decisions
/// themselves: every failure here must default to "no evidence", never to
/// "attacker confirmed".
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// True only if every comma-separated address in `cluster` has non-empty
    /// code at the current head.
    async fn is_contract(&self, cluster: &str) -> Result<bool, ChainClientError>;

    /// Scans the given block's fee-transfer logs for a validator address and
    /// returns it if found, regardless of whether it matches any cluster —
    /// callers compare the result against the cluster string themselves.
    async fn fee_transfer_validator(&self, block_number: u64) -> Result<Option<String>, ChainClientError>;
}

const LOG_FEE_TRANSFER_TOPIC: &str =
    "0x4dfe1bbbcf077ddc3e01291eea2d5c70c2b422b415d95645b9adcfd678cb1d63";

/// JSON-RPC-backed implementation, talking to whatever node the deployment
/// configures (Polygon, in practice, for the validator heuristic).
pub struct JsonRpcChainClient {
    http: reqwest::Client,
    rpc_url: String,
}

impl JsonRpcChainClient {
    pub fn new(rpc_url: String) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("failed to build chain-client http session"),
            rpc_url,
        }
    }

    async fn rpc_call(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value, ChainClientError> {
        #[derive(Deserialize)]
        struct RpcResponse {
            result: Option<serde_json::Value>,
            error: Option<serde_json::Value>,
        }

        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response: RpcResponse = self
            .http
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(ChainClientError::RpcFault(err.to_string()));
        }
        response.result.ok_or_else(|| ChainClientError::Decode("missing result".into()))
    }
}

#[async_trait]
impl ChainClient for JsonRpcChainClient {
    async fn is_contract(&self, cluster: &str) -> Result<bool, ChainClientError> {
        for address in cluster.split(',') {
            let code = self
                .rpc_call("eth_getCode", json!([address, "latest"]))
                .await?;
            let code = code.as_str().unwrap_or("0x");
            if code == "0x" || code.is_empty() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn fee_transfer_validator(&self, block_number: u64) -> Result<Option<String>, ChainClientError> {
        let block_hex = format!("0x{:x}", block_number);
        let receipts = self
            .rpc_call("eth_getBlockReceipts", json!([block_hex]))
            .await?;

        let Some(receipts) = receipts.as_array() else {
            return Ok(None);
        };

        for receipt in receipts {
            let Some(logs) = receipt.get("logs").and_then(|l| l.as_array()) else {
                continue;
            };
            for log in logs {
                let Some(topics) = log.get("topics").and_then(|t| t.as_array()) else {
                    continue;
                };
                if topics.len() <= 3 {
                    continue;
                }
                let Some(event_topic) = topics[0].as_str() else { continue };
                if event_topic.eq_ignore_ascii_case(LOG_FEE_TRANSFER_TOPIC) {
                    if let Some(validator_topic) = topics[3].as_str() {
                        let validator = validator_topic.trim_start_matches("0x");
                        let validator = &validator[validator.len().saturating_sub(40)..];
                        return Ok(Some(validator.to_lowercase()));
                    }
                }
            }
        }
        Ok(None)
    }
}

/// Deterministic stand-in for tests: no network, caller-provided answers.
pub struct StubChainClient {
    pub contracts: std::collections::HashSet<String>,
    pub validator_by_block: std::collections::HashMap<u64, String>,
}

impl StubChainClient {
    pub fn new() -> Self {
        Self {
            contracts: Default::default(),
            validator_by_block: Default::default(),
        }
    }
}

impl Default for StubChainClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainClient for StubChainClient {
    async fn is_contract(&self, cluster: &str) -> Result<bool, ChainClientError> {
        Ok(cluster.split(',').all(|a| self.contracts.contains(a)))
    }

    async fn fee_transfer_validator(&self, block_number: u64) -> Result<Option<String>, ChainClientError> {
        Ok(self.validator_by_block.get(&block_number).cloned())
    }
}
// FIN DEL ARCHIVO [libs/infra/chain-client/src/lib.rs]
