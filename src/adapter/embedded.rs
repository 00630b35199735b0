//! Embedded key-management adapter (social login channels).
//!
//! Stands in for a hosted key-management provider: the account key for each
//! login channel is resolved locally, from the environment variable named in
//! config (or an explicit dev key), and signing happens in-process. The
//! resulting handle can therefore export its private key, which the node
//! adapter cannot.
//!
//! # Security
//! - Key material comes ONLY from environment variables or an explicit
//!   `dev_key` config entry
//! - Keys are never logged or serialized

use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::adapter::handle::ProviderHandle;
use crate::adapter::{AdapterError, AdapterKind, ConnectParams, LoginProvider, UserInfo, WalletAdapter};
use crate::config::schema::{ChainConfig, EmbeddedAdapterConfig, LoginChannelConfig};

/// Social-login adapter holding per-channel key material locally.
pub struct EmbeddedKeyAdapter {
    config: EmbeddedAdapterConfig,
    /// Set by `init`.
    chain: Option<ChainConfig>,
    rpc_url: Option<url::Url>,
    /// Set by a successful `connect`.
    connected: Option<ConnectedChannel>,
}

struct ConnectedChannel {
    provider: LoginProvider,
    verifier: String,
    address: alloy::primitives::Address,
}

impl EmbeddedKeyAdapter {
    /// Create the adapter from its configuration section.
    pub fn new(config: EmbeddedAdapterConfig) -> Self {
        Self {
            config,
            chain: None,
            rpc_url: None,
            connected: None,
        }
    }

    fn channel_config(&self, provider: LoginProvider) -> &LoginChannelConfig {
        match provider {
            LoginProvider::Google => &self.config.google,
            LoginProvider::Facebook => &self.config.facebook,
        }
    }

    /// Resolve the signer for a login channel.
    ///
    /// The environment variable wins over the inline dev key. The key value
    /// itself must never appear in errors or logs.
    fn resolve_signer(&self, provider: LoginProvider) -> Result<PrivateKeySigner, AdapterError> {
        let channel = self.channel_config(provider);
        let key_hex = match std::env::var(&channel.key_env) {
            Ok(value) if !value.trim().is_empty() => value,
            _ => match &channel.dev_key {
                Some(key) => key.clone(),
                None => {
                    return Err(AdapterError::KeyMissing {
                        channel: provider.to_string(),
                        key_env: channel.key_env.clone(),
                    })
                }
            },
        };

        let key_hex = key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);
        key_hex
            .parse::<PrivateKeySigner>()
            .map_err(|_| AdapterError::InvalidKey {
                channel: provider.to_string(),
            })
    }
}

#[async_trait]
impl WalletAdapter for EmbeddedKeyAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Embedded
    }

    async fn init(&mut self, chain: &ChainConfig) -> Result<(), AdapterError> {
        let rpc_url: url::Url = chain.rpc_url.parse().map_err(|e| {
            AdapterError::Config(format!("invalid RPC URL '{}': {}", chain.rpc_url, e))
        })?;

        debug!(
            chain_id = chain.chain_id,
            display_name = %self.config.display_name,
            mfa_level = %self.config.mfa_level,
            "Embedded key adapter initialized"
        );

        self.chain = Some(chain.clone());
        self.rpc_url = Some(rpc_url);
        Ok(())
    }

    async fn connect(&mut self, params: &ConnectParams) -> Result<ProviderHandle, AdapterError> {
        let chain = self.chain.clone().ok_or(AdapterError::NotInitialized)?;
        let rpc_url = self.rpc_url.clone().ok_or(AdapterError::NotInitialized)?;
        let login_provider = params
            .login_provider
            .ok_or(AdapterError::LoginProviderRequired)?;

        let mut signer = self.resolve_signer(login_provider)?;
        signer.set_chain_id(Some(chain.chain_id));
        let address = signer.address();

        let provider = ProviderBuilder::new()
            .wallet(signer.clone())
            .connect_http(rpc_url)
            .erased();

        let verifier = self.channel_config(login_provider).verifier.clone();
        info!(
            login_provider = %login_provider,
            verifier = %verifier,
            address = %address,
            chain_id = chain.chain_id,
            "Embedded session connected"
        );

        self.connected = Some(ConnectedChannel {
            provider: login_provider,
            verifier,
            address,
        });

        Ok(ProviderHandle::new(
            AdapterKind::Embedded,
            chain,
            provider,
            vec![address],
            Some(signer),
        ))
    }

    async fn logout(&mut self) -> Result<(), AdapterError> {
        if let Some(channel) = self.connected.take() {
            info!(login_provider = %channel.provider, "Embedded session closed");
        }
        Ok(())
    }

    async fn user_info(&self) -> Result<UserInfo, AdapterError> {
        let channel = self
            .connected
            .as_ref()
            .ok_or_else(|| AdapterError::Connect("no connected session".to_string()))?;

        // No OAuth exchange happens in-process, so name/email are unknown.
        Ok(UserInfo {
            name: None,
            email: None,
            login_provider: Some(channel.provider),
            verifier: Some(channel.verifier.clone()),
            addresses: vec![channel.address.to_checksum(None)],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::AppConfig;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    fn test_chain() -> ChainConfig {
        AppConfig::default().chains["sepolia"].clone()
    }

    fn adapter_with_dev_key(key: &str) -> EmbeddedKeyAdapter {
        let mut config = EmbeddedAdapterConfig::default();
        config.google.key_env = "WALLET_CONSOLE_TEST_UNSET".to_string();
        config.google.dev_key = Some(key.to_string());
        EmbeddedKeyAdapter::new(config)
    }

    #[tokio::test]
    async fn test_connect_with_dev_key() {
        let mut adapter = adapter_with_dev_key(TEST_PRIVATE_KEY);
        adapter.init(&test_chain()).await.unwrap();

        let handle = adapter
            .connect(&ConnectParams::social(LoginProvider::Google))
            .await
            .unwrap();

        assert_eq!(handle.kind(), AdapterKind::Embedded);
        assert!(handle.has_local_key());
        assert_eq!(
            handle.primary_account().unwrap().to_string().to_lowercase(),
            TEST_ADDRESS
        );
    }

    #[tokio::test]
    async fn test_connect_accepts_0x_prefix() {
        let mut adapter = adapter_with_dev_key(&format!("0x{}", TEST_PRIVATE_KEY));
        adapter.init(&test_chain()).await.unwrap();
        let handle = adapter
            .connect(&ConnectParams::social(LoginProvider::Google))
            .await
            .unwrap();
        assert_eq!(
            handle.primary_account().unwrap().to_string().to_lowercase(),
            TEST_ADDRESS
        );
    }

    #[tokio::test]
    async fn test_connect_without_init_fails() {
        let mut adapter = adapter_with_dev_key(TEST_PRIVATE_KEY);
        let result = adapter
            .connect(&ConnectParams::social(LoginProvider::Google))
            .await;
        assert!(matches!(result, Err(AdapterError::NotInitialized)));
    }

    #[tokio::test]
    async fn test_connect_requires_login_provider() {
        let mut adapter = adapter_with_dev_key(TEST_PRIVATE_KEY);
        adapter.init(&test_chain()).await.unwrap();
        let result = adapter.connect(&ConnectParams::default()).await;
        assert!(matches!(result, Err(AdapterError::LoginProviderRequired)));
    }

    #[tokio::test]
    async fn test_missing_key_is_typed_error() {
        let mut config = EmbeddedAdapterConfig::default();
        config.facebook.key_env = "WALLET_CONSOLE_TEST_UNSET".to_string();
        config.facebook.dev_key = None;
        let mut adapter = EmbeddedKeyAdapter::new(config);
        adapter.init(&test_chain()).await.unwrap();

        let result = adapter
            .connect(&ConnectParams::social(LoginProvider::Facebook))
            .await;
        match result {
            Err(AdapterError::KeyMissing { channel, .. }) => assert_eq!(channel, "facebook"),
            other => panic!("expected KeyMissing, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_key_is_typed_error() {
        let mut adapter = adapter_with_dev_key("not-a-key");
        adapter.init(&test_chain()).await.unwrap();
        let result = adapter
            .connect(&ConnectParams::social(LoginProvider::Google))
            .await;
        assert!(matches!(result, Err(AdapterError::InvalidKey { .. })));
    }

    #[tokio::test]
    async fn test_user_info_reports_channel_and_address() {
        let mut adapter = adapter_with_dev_key(TEST_PRIVATE_KEY);
        adapter.init(&test_chain()).await.unwrap();
        adapter
            .connect(&ConnectParams::social(LoginProvider::Google))
            .await
            .unwrap();

        let info = adapter.user_info().await.unwrap();
        assert_eq!(info.login_provider, Some(LoginProvider::Google));
        assert_eq!(info.verifier.as_deref(), Some("demo-google-verifier"));
        assert_eq!(info.addresses.len(), 1);
        assert!(info.name.is_none());
    }
}
