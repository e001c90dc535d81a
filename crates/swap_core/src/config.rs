use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "SWAP_CONFIG";

/// Default config file, resolved relative to the working directory.
const DEFAULT_CONFIG_FILE: &str = "swap.toml";

const DEFAULT_RPC_URL: &str = "http://localhost:8545";
const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";
const DEFAULT_CONFIRM_POLL_MS: u64 = 500;
const DEFAULT_CONFIRM_TIMEOUT_SECS: u64 = 120;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Settings for the contract deployment flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// JSON-RPC endpoint of the node that receives the deployment
    /// transactions. The node is expected to manage its own signer
    /// accounts (a local development node does).
    pub rpc_url: String,
    /// Directory containing the compiled contract artifacts
    /// (`<Name>.json` with `abi` and `bytecode` fields).
    pub artifacts_dir: PathBuf,
    /// Interval between transaction receipt polls.
    pub confirm_poll_ms: u64,
    /// How long to wait for a deployment to be confirmed.
    pub confirm_timeout_secs: u64,
    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.into(),
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            confirm_poll_ms: DEFAULT_CONFIRM_POLL_MS,
            confirm_timeout_secs: DEFAULT_CONFIRM_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Settings for the wallet connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Endpoint of the wallet provider. `None` means no provider is
    /// available in this environment -- the connector then reports the
    /// "install a wallet" condition instead of attempting a request.
    pub rpc_url: Option<String>,
    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Top-level configuration stored in `swap.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapConfig {
    pub deploy: DeployConfig,
    pub wallet: WalletConfig,
}

impl SwapConfig {
    /// Load configuration from the default location: the path in
    /// `$SWAP_CONFIG` if set, otherwise `./swap.toml`.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from_file(&path)
    }

    /// Load configuration from a TOML file. Returns defaults if the file
    /// does not exist.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Reject malformed endpoint URLs up front rather than at the first
    /// failed HTTP request.
    fn validate(&self) -> Result<()> {
        if !validate_url(&self.deploy.rpc_url) {
            anyhow::bail!("invalid deploy RPC URL: {}", self.deploy.rpc_url);
        }
        if let Some(url) = &self.wallet.rpc_url {
            if !validate_url(url) {
                anyhow::bail!("invalid wallet provider URL: {url}");
            }
        }
        Ok(())
    }
}

/// Validate that a URL is well-formed and uses HTTP or HTTPS.
pub fn validate_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            (scheme == "http" || scheme == "https") && parsed.host().is_some()
        }
        Err(_) => false,
    }
}
