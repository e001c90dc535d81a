//! Shared configuration and logging for the pascalswap tools.

pub mod config;
pub mod logging;

// Re-export primary types for convenient access.
pub use config::{DeployConfig, SwapConfig, WalletConfig, validate_url};
pub use logging::init_logging;
