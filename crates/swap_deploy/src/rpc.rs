//! JSON-RPC deployer implementation.
//!
//! Talks to a node that manages its own signer accounts (a local
//! development node does): the first `eth_accounts` entry funds and signs
//! every deployment transaction, mirroring the toolchain's implicit
//! default signer. Gas estimation and pricing are left to the node.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use swap_core::DeployConfig;

use crate::{ContractDeployer, ContractFactory, DeployError, DeployedContract, artifacts};

// ---------------------------------------------------------------------------
// JSON-RPC wire types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct RpcRequest {
    jsonrpc: &'static str,
    method: &'static str,
    params: serde_json::Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<serde_json::Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeployTxParams {
    from: String,
    data: String,
}

/// The receipt fields the deployment flow inspects.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxReceipt {
    contract_address: Option<String>,
    status: Option<String>,
}

// ---------------------------------------------------------------------------
// RpcDeployer
// ---------------------------------------------------------------------------

/// Deployer backed by a JSON-RPC node endpoint.
pub struct RpcDeployer {
    endpoint: String,
    artifacts_dir: PathBuf,
    confirm_poll: Duration,
    confirm_timeout: Duration,
    client: reqwest::Client,
}

impl RpcDeployer {
    /// Create a deployer from the deploy section of the config.
    pub fn new(config: &DeployConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            endpoint: config.rpc_url.clone(),
            artifacts_dir: config.artifacts_dir.clone(),
            confirm_poll: Duration::from_millis(config.confirm_poll_ms),
            confirm_timeout: Duration::from_secs(config.confirm_timeout_secs),
            client,
        }
    }

    async fn call(
        &self,
        method: &'static str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, DeployError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };
        debug!(method, endpoint = %self.endpoint, "node request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| DeployError::Network(e.to_string()))?;

        let response: RpcResponse = response
            .json()
            .await
            .map_err(|e| DeployError::Network(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(DeployError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(response.result.unwrap_or(serde_json::Value::Null))
    }

    /// The node-managed account that signs the deployment transactions.
    async fn deployer_account(&self) -> Result<String, DeployError> {
        let result = self.call("eth_accounts", serde_json::json!([])).await?;
        let accounts: Vec<String> = serde_json::from_value(result).unwrap_or_default();
        accounts.into_iter().next().ok_or(DeployError::NoAccounts)
    }

    async fn send_deploy_tx(
        &self,
        from: &str,
        factory: &ContractFactory,
    ) -> Result<String, DeployError> {
        let params = DeployTxParams {
            from: from.to_string(),
            data: factory.bytecode.clone(),
        };
        let result = self
            .call("eth_sendTransaction", serde_json::json!([params]))
            .await?;
        serde_json::from_value(result).map_err(|e| DeployError::Network(e.to_string()))
    }

    /// Poll for the transaction receipt until it appears or the
    /// confirmation timeout elapses.
    async fn wait_for_receipt(
        &self,
        name: &str,
        tx_hash: &str,
    ) -> Result<TxReceipt, DeployError> {
        let started = Instant::now();
        loop {
            let result = self
                .call("eth_getTransactionReceipt", serde_json::json!([tx_hash]))
                .await?;
            if !result.is_null() {
                return serde_json::from_value(result)
                    .map_err(|e| DeployError::Network(e.to_string()));
            }
            if started.elapsed() >= self.confirm_timeout {
                return Err(DeployError::Confirmation {
                    name: name.to_string(),
                    waited_secs: self.confirm_timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.confirm_poll).await;
        }
    }
}

#[async_trait]
impl ContractDeployer for RpcDeployer {
    async fn get_factory(&self, name: &str) -> Result<ContractFactory, DeployError> {
        artifacts::load_artifact(&self.artifacts_dir, name)
    }

    async fn deploy(&self, factory: &ContractFactory) -> Result<DeployedContract, DeployError> {
        let from = self.deployer_account().await?;
        let tx_hash = self.send_deploy_tx(&from, factory).await?;
        info!(contract = %factory.name, tx_hash = %tx_hash, "deployment transaction sent");

        let receipt = self.wait_for_receipt(&factory.name, &tx_hash).await?;

        if receipt.status.as_deref() == Some("0x0") {
            return Err(DeployError::Reverted {
                name: factory.name.clone(),
            });
        }
        let address = receipt
            .contract_address
            .ok_or_else(|| DeployError::MissingAddress {
                name: factory.name.clone(),
            })?;

        Ok(DeployedContract {
            name: factory.name.clone(),
            address,
            tx_hash,
            deployed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deploy_tx_params_serialize_to_wire_names() {
        let params = DeployTxParams {
            from: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".into(),
            data: "0x6080604052".into(),
        };
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"from\""));
        assert!(json.contains("\"data\":\"0x6080604052\""));
    }

    #[test]
    fn receipt_parses_contract_address() {
        let receipt: TxReceipt = serde_json::from_str(
            r#"{"contractAddress":"0x5FbDB2315678afecb367f032d93F642f64180aa3","status":"0x1","blockNumber":"0x1"}"#,
        )
        .unwrap();
        assert_eq!(
            receipt.contract_address.as_deref(),
            Some("0x5FbDB2315678afecb367f032d93F642f64180aa3")
        );
        assert_eq!(receipt.status.as_deref(), Some("0x1"));
    }

    #[test]
    fn receipt_tolerates_missing_fields() {
        let receipt: TxReceipt = serde_json::from_str(r#"{}"#).unwrap();
        assert!(receipt.contract_address.is_none());
        assert!(receipt.status.is_none());
    }

    #[test]
    fn rpc_error_maps_to_deploy_error() {
        let response: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"insufficient funds for gas * price + value"}}"#,
        )
        .unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, -32000);
        assert!(error.message.contains("insufficient funds"));
    }

    #[tokio::test]
    async fn unreachable_node_is_a_network_error() {
        let config = DeployConfig {
            rpc_url: "http://127.0.0.1:9".into(),
            request_timeout_secs: 1,
            ..Default::default()
        };
        let deployer = RpcDeployer::new(&config);
        let result = deployer.deployer_account().await;
        assert!(matches!(result, Err(DeployError::Network(_))));
    }
}
