//! Wallet provider abstraction and the JSON-RPC implementation.
//!
//! The provider plays the role of the injected `window.ethereum` object:
//! one asynchronous account-request call that may be refused by the user.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// EIP-1193 error code for a user-rejected request.
const CODE_USER_REJECTED: i64 = 4001;

/// JSON-RPC error code for an unknown method.
const CODE_METHOD_NOT_FOUND: i64 = -32601;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors an account request may return.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("connection request rejected by the user")]
    Rejected,

    #[error("provider returned no accounts")]
    NoAccounts,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider error {code}: {message}")]
    Rpc { code: i64, message: String },
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Interface to a wallet capable of granting account access.
///
/// Mirrors the `eth_requestAccounts` call of a browser wallet: a single
/// request that either yields an ordered list of address strings or a
/// refusal. The connector treats everything behind this trait as opaque.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Request access to the wallet's accounts.
    ///
    /// A successful response contains at least one address; implementations
    /// must map an empty list to [`ProviderError::NoAccounts`].
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;
}

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

impl RpcRequest {
    fn new(method: &'static str, id: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params: serde_json::Value::Array(vec![]),
            id,
        }
    }
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

// ---------------------------------------------------------------------------
// NodeWalletProvider
// ---------------------------------------------------------------------------

/// Wallet provider backed by a JSON-RPC endpoint.
///
/// Sends `eth_requestAccounts` and falls back to `eth_accounts` when the
/// endpoint is a plain node that does not implement the wallet method
/// (local development nodes expose their unlocked accounts that way).
pub struct NodeWalletProvider {
    endpoint: String,
    client: reqwest::Client,
}

impl NodeWalletProvider {
    /// Create a provider pointing at the given endpoint.
    pub fn new(endpoint: String, request_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .unwrap_or_default();
        Self { endpoint, client }
    }

    async fn call(&self, method: &'static str) -> Result<RpcResponse, ProviderError> {
        let request = RpcRequest::new(method, 1);
        debug!(method, endpoint = %self.endpoint, "wallet provider request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        response
            .json::<RpcResponse>()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))
    }
}

#[async_trait]
impl WalletProvider for NodeWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        let mut response = self.call("eth_requestAccounts").await?;

        if let Some(error) = &response.error {
            match error.code {
                CODE_USER_REJECTED => return Err(ProviderError::Rejected),
                CODE_METHOD_NOT_FOUND => {
                    // Plain node without the wallet surface.
                    response = self.call("eth_accounts").await?;
                }
                _ => {}
            }
        }

        if let Some(error) = response.error {
            return Err(ProviderError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        let accounts: Vec<String> = response
            .result
            .map(|v| serde_json::from_value(v).unwrap_or_default())
            .unwrap_or_default();

        if accounts.is_empty() {
            return Err(ProviderError::NoAccounts);
        }
        Ok(accounts)
    }
}
