//! Wallet connection flow: a provider abstraction for MetaMask-style
//! account access and the connector state machine built on top of it.

pub mod connector;
pub mod provider;

// Re-export primary types for convenient access.
pub use connector::{ConnectOutcome, WalletConnector, WalletState};
pub use provider::{NodeWalletProvider, ProviderError, WalletProvider};
