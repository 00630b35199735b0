//! External wallet node adapter.
//!
//! The analogue of a browser-extension wallet: account management and signing
//! stay on the node side. This adapter only discovers the node's unlocked
//! accounts and hands out a provider bound to the node's endpoint; it never
//! holds key material, so handles it produces cannot export a private key.

use std::time::Duration;

use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::adapter::handle::ProviderHandle;
use crate::adapter::{AdapterError, AdapterKind, ConnectParams, UserInfo, WalletAdapter};
use crate::config::schema::{ChainConfig, NodeAdapterConfig};

/// Adapter delegating to a JSON-RPC node with unlocked accounts.
pub struct NodeWalletAdapter {
    config: NodeAdapterConfig,
    endpoint: url::Url,
    /// Set by `init`.
    chain: Option<ChainConfig>,
    provider: Option<DynProvider>,
    /// Set by a successful `connect`.
    accounts: Vec<Address>,
}

impl NodeWalletAdapter {
    /// Create the adapter from its configuration section.
    pub fn new(config: NodeAdapterConfig) -> Result<Self, AdapterError> {
        let endpoint: url::Url = config.endpoint.parse().map_err(|e| {
            AdapterError::Config(format!("invalid node endpoint '{}': {}", config.endpoint, e))
        })?;

        Ok(Self {
            config,
            endpoint,
            chain: None,
            provider: None,
            accounts: Vec::new(),
        })
    }

    fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.config.connect_timeout_secs)
    }
}

#[async_trait]
impl WalletAdapter for NodeWalletAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Node
    }

    async fn init(&mut self, chain: &ChainConfig) -> Result<(), AdapterError> {
        let provider = ProviderBuilder::new()
            .connect_http(self.endpoint.clone())
            .erased();

        debug!(
            endpoint = %self.endpoint,
            chain_id = chain.chain_id,
            "Node wallet adapter initialized"
        );

        self.chain = Some(chain.clone());
        self.provider = Some(provider);
        Ok(())
    }

    async fn connect(&mut self, _params: &ConnectParams) -> Result<ProviderHandle, AdapterError> {
        let chain = self.chain.clone().ok_or(AdapterError::NotInitialized)?;
        let provider = self.provider.clone().ok_or(AdapterError::NotInitialized)?;

        let accounts = timeout(self.connect_timeout(), provider.get_accounts())
            .await
            .map_err(|_| {
                AdapterError::Connect(format!(
                    "account query timed out after {}s",
                    self.config.connect_timeout_secs
                ))
            })?
            .map_err(|e| AdapterError::Connect(format!("account query failed: {e}")))?;

        if accounts.is_empty() {
            return Err(AdapterError::NoAccounts {
                endpoint: self.config.endpoint.clone(),
            });
        }

        // The node decides which chain it serves; a mismatch with the
        // configured chain is reported but does not block the session.
        match timeout(self.connect_timeout(), provider.get_chain_id()).await {
            Ok(Ok(actual)) if actual != chain.chain_id => {
                warn!(
                    expected = chain.chain_id,
                    actual = actual,
                    "Wallet node serves a different chain than configured"
                );
            }
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!(error = %e, "Chain id verification failed"),
            Err(_) => warn!("Chain id verification timed out"),
        }

        info!(
            endpoint = %self.endpoint,
            accounts = accounts.len(),
            primary = %accounts[0],
            "Node wallet session connected"
        );

        self.accounts = accounts.clone();
        Ok(ProviderHandle::new(
            AdapterKind::Node,
            chain,
            provider,
            accounts,
            None,
        ))
    }

    async fn logout(&mut self) -> Result<(), AdapterError> {
        // There is no node-side session to revoke; forget the account list.
        if !self.accounts.is_empty() {
            debug!(endpoint = %self.endpoint, "Node wallet session closed");
            self.accounts.clear();
        }
        Ok(())
    }

    async fn user_info(&self) -> Result<UserInfo, AdapterError> {
        if self.accounts.is_empty() {
            return Err(AdapterError::Connect("no connected session".to_string()));
        }

        // The node exposes no profile; addresses are all there is.
        Ok(UserInfo {
            addresses: self
                .accounts
                .iter()
                .map(|a| a.to_checksum(None))
                .collect(),
            ..UserInfo::default()
        })
    }
}
