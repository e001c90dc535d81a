//! Contract deployment flow.
//!
//! Publishes the three project contracts (PascalCoin, RobinCoin,
//! SimpleSwap) through a [`ContractDeployer`], which hides the toolchain
//! behind two calls: obtain a factory by name, deploy a factory. The real
//! implementation talks JSON-RPC to a node; tests substitute a fake.

pub mod artifacts;
pub mod rpc;
pub mod runner;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export primary types for convenient access.
pub use artifacts::load_artifact;
pub use rpc::RpcDeployer;
pub use runner::{CONTRACTS, run};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors the deployment flow may return. Every variant is fatal to the
/// whole run: the sequence halts at the first failure, already-deployed
/// contracts stay deployed.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("Artifact error for {name}: {reason}")]
    Artifact { name: String, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("no deployer account available on the node")]
    NoAccounts,

    #[error("deployment of {name} not confirmed after {waited_secs}s")]
    Confirmation { name: String, waited_secs: u64 },

    #[error("deployment transaction for {name} reverted")]
    Reverted { name: String },

    #[error("receipt for {name} carries no contract address")]
    MissingAddress { name: String },
}

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A deployable contract: its ABI and creation bytecode, obtained from a
/// compiled artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractFactory {
    pub name: String,
    pub abi: serde_json::Value,
    pub bytecode: String,
}

/// A confirmed deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployedContract {
    pub name: String,
    pub address: String,
    pub tx_hash: String,
    pub deployed_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Interface to the contract toolchain.
///
/// The runner drives deployments exclusively through this trait, so a test
/// double can simulate per-contract success or failure without a network.
#[async_trait]
pub trait ContractDeployer: Send + Sync {
    /// Obtain a deployable factory for a named contract.
    async fn get_factory(&self, name: &str) -> Result<ContractFactory, DeployError>;

    /// Deploy a factory and wait until the contract is confirmed on chain.
    async fn deploy(&self, factory: &ContractFactory) -> Result<DeployedContract, DeployError>;
}
