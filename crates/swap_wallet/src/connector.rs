//! Connector state machine for the wallet connection flow.

use std::sync::Arc;

use tracing::{info, warn};

use crate::provider::WalletProvider;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// The two states of the connection machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletState {
    Disconnected,
    /// Holds the address exactly as the provider returned it.
    Connected(String),
}

/// What a single `connect()` invocation produced.
///
/// Failures are reported through this value, never as a hard error: both
/// failure conditions are terminal for the invocation and leave the
/// connector state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// The provider granted access; the first returned address is now held.
    Connected(String),
    /// No provider capability was injected at construction.
    ProviderAbsent,
    /// The provider refused or failed the request.
    Rejected,
}

// ---------------------------------------------------------------------------
// Connector
// ---------------------------------------------------------------------------

/// Owns the connected-address state and the optional provider capability.
///
/// The state is local to the connector: initialized empty, mutated only by
/// [`connect`](Self::connect) and [`disconnect`](Self::disconnect), and
/// discarded when the connector is dropped. `connect` takes `&mut self`,
/// so overlapping connection requests cannot race on the state.
pub struct WalletConnector {
    provider: Option<Arc<dyn WalletProvider>>,
    address: Option<String>,
}

impl WalletConnector {
    /// Create a disconnected connector with an optional provider.
    ///
    /// Passing `None` models the environment where no wallet is installed.
    pub fn new(provider: Option<Arc<dyn WalletProvider>>) -> Self {
        Self {
            provider,
            address: None,
        }
    }

    /// Request account access from the provider.
    ///
    /// On success the first returned address becomes the connected address.
    /// On provider absence or refusal the state is left unchanged and the
    /// condition is reported once through the returned outcome.
    pub async fn connect(&mut self) -> ConnectOutcome {
        let Some(provider) = self.provider.clone() else {
            warn!("no wallet provider available");
            return ConnectOutcome::ProviderAbsent;
        };

        match provider.request_accounts().await {
            Ok(accounts) => match accounts.into_iter().next() {
                Some(address) => {
                    info!(address = %address, "wallet connected");
                    self.address = Some(address.clone());
                    ConnectOutcome::Connected(address)
                }
                None => {
                    warn!("provider granted access but returned no accounts");
                    ConnectOutcome::Rejected
                }
            },
            Err(e) => {
                warn!(error = %e, "wallet connection failed");
                ConnectOutcome::Rejected
            }
        }
    }

    /// Clear the connected address.
    ///
    /// Pure local effect: no provider-side session or permission is revoked.
    pub fn disconnect(&mut self) {
        if self.address.take().is_some() {
            info!("wallet disconnected");
        }
    }

    /// Current state of the machine.
    pub fn state(&self) -> WalletState {
        match &self.address {
            Some(address) => WalletState::Connected(address.clone()),
            None => WalletState::Disconnected,
        }
    }

    /// The connected address, if any.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Whether an address is currently held.
    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    /// User-facing status line, present only while connected.
    pub fn status_line(&self) -> Option<String> {
        self.address.as_ref().map(|a| format!("Conectado como: {a}"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::provider::ProviderError;

    /// What the fake provider should do on each request.
    enum FakeBehavior {
        Grant(Vec<String>),
        Reject,
        NetworkFailure,
        GrantEmpty,
    }

    struct FakeProvider {
        behavior: FakeBehavior,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(behavior: FakeBehavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl WalletProvider for FakeProvider {
        async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                FakeBehavior::Grant(accounts) => Ok(accounts.clone()),
                FakeBehavior::Reject => Err(ProviderError::Rejected),
                FakeBehavior::NetworkFailure => {
                    Err(ProviderError::Network("connection refused".into()))
                }
                FakeBehavior::GrantEmpty => Ok(vec![]),
            }
        }
    }

    #[tokio::test]
    async fn connect_stores_first_address() {
        let provider = FakeProvider::new(FakeBehavior::Grant(vec![
            "0xABC".into(),
            "0xDEF".into(),
        ]));
        let mut connector = WalletConnector::new(Some(provider));

        let outcome = connector.connect().await;
        assert_eq!(outcome, ConnectOutcome::Connected("0xABC".into()));
        assert_eq!(connector.address(), Some("0xABC"));
        assert_eq!(connector.state(), WalletState::Connected("0xABC".into()));
    }

    #[tokio::test]
    async fn status_line_shows_connected_address() {
        let provider = FakeProvider::new(FakeBehavior::Grant(vec!["0xABC".into()]));
        let mut connector = WalletConnector::new(Some(provider));

        assert!(connector.status_line().is_none());
        connector.connect().await;
        assert_eq!(
            connector.status_line().as_deref(),
            Some("Conectado como: 0xABC")
        );
    }

    #[tokio::test]
    async fn absent_provider_never_mutates_state() {
        let mut connector = WalletConnector::new(None);

        let outcome = connector.connect().await;
        assert_eq!(outcome, ConnectOutcome::ProviderAbsent);
        assert_eq!(connector.state(), WalletState::Disconnected);
        assert!(!connector.is_connected());
    }

    #[tokio::test]
    async fn rejection_leaves_state_unchanged_and_is_reported_once() {
        let provider = FakeProvider::new(FakeBehavior::Reject);
        let mut connector = WalletConnector::new(Some(provider.clone()));

        let outcome = connector.connect().await;
        assert_eq!(outcome, ConnectOutcome::Rejected);
        assert_eq!(connector.state(), WalletState::Disconnected);
        // One invocation, one provider request, one reported outcome.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn network_failure_is_reported_as_rejection() {
        let provider = FakeProvider::new(FakeBehavior::NetworkFailure);
        let mut connector = WalletConnector::new(Some(provider));

        let outcome = connector.connect().await;
        assert_eq!(outcome, ConnectOutcome::Rejected);
        assert!(!connector.is_connected());
    }

    #[tokio::test]
    async fn empty_account_list_is_a_rejection() {
        let provider = FakeProvider::new(FakeBehavior::GrantEmpty);
        let mut connector = WalletConnector::new(Some(provider));

        let outcome = connector.connect().await;
        assert_eq!(outcome, ConnectOutcome::Rejected);
        assert_eq!(connector.state(), WalletState::Disconnected);
    }

    #[tokio::test]
    async fn disconnect_clears_state() {
        let provider = FakeProvider::new(FakeBehavior::Grant(vec!["0xABC".into()]));
        let mut connector = WalletConnector::new(Some(provider));

        connector.connect().await;
        assert!(connector.is_connected());

        connector.disconnect();
        assert_eq!(connector.state(), WalletState::Disconnected);
        assert!(connector.status_line().is_none());
    }

    #[tokio::test]
    async fn disconnect_when_already_disconnected_is_a_no_op() {
        let mut connector = WalletConnector::new(None);
        connector.disconnect();
        assert_eq!(connector.state(), WalletState::Disconnected);
    }

    #[tokio::test]
    async fn failed_reconnect_keeps_previous_address() {
        let provider = FakeProvider::new(FakeBehavior::Grant(vec!["0xABC".into()]));
        let mut connector = WalletConnector::new(Some(provider));
        connector.connect().await;

        // Swap the provider for one that refuses; the held address survives.
        connector.provider = Some(FakeProvider::new(FakeBehavior::Reject));
        let outcome = connector.connect().await;
        assert_eq!(outcome, ConnectOutcome::Rejected);
        assert_eq!(connector.address(), Some("0xABC"));
    }
}
