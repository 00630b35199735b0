//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the console.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration for the wallet console.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application identifier registered with the key-management provider.
    pub client_id: String,

    /// Name of the chain entry to target (key into `chains`).
    pub default_network: String,

    /// Per-call RPC timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Static lookup of network parameters, keyed by network name.
    pub chains: BTreeMap<String, ChainConfig>,

    /// Embedded key-management (social login) adapter settings.
    pub embedded: EmbeddedAdapterConfig,

    /// External wallet node adapter settings.
    pub node: NodeAdapterConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut chains = BTreeMap::new();
        chains.insert(
            "sepolia".to_string(),
            ChainConfig {
                chain_id: 11_155_111,
                rpc_url: "https://rpc.sepolia.org".to_string(),
                display_name: "Ethereum Sepolia".to_string(),
                network_kind: NetworkKind::Testnet,
            },
        );
        chains.insert(
            "mainnet".to_string(),
            ChainConfig {
                chain_id: 1,
                rpc_url: "https://eth.llamarpc.com".to_string(),
                display_name: "Ethereum Mainnet".to_string(),
                network_kind: NetworkKind::Mainnet,
            },
        );

        Self {
            client_id: "wallet-console-dev".to_string(),
            default_network: "sepolia".to_string(),
            rpc_timeout_secs: 10,
            chains,
            embedded: EmbeddedAdapterConfig::default(),
            node: NodeAdapterConfig::default(),
        }
    }
}

impl AppConfig {
    /// Resolve the chain entry named by `default_network`.
    ///
    /// Validation guarantees the entry exists for configs accepted at startup.
    pub fn active_chain(&self) -> Option<&ChainConfig> {
        self.chains.get(&self.default_network)
    }
}

/// Static network parameters for one chain.
///
/// Immutable once loaded; never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChainConfig {
    /// Numeric chain id (EIP-155).
    pub chain_id: u64,

    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Human-readable network name for the console.
    pub display_name: String,

    /// Whether this entry is a mainnet or a testnet.
    #[serde(default)]
    pub network_kind: NetworkKind,
}

/// Coarse network classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    Mainnet,
    #[default]
    Testnet,
}

/// Settings for the embedded key-management (social login) adapter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EmbeddedAdapterConfig {
    /// Display name shown for this login surface.
    pub display_name: String,

    /// Multi-factor level requested from the key-management provider.
    pub mfa_level: String,

    /// Google login channel settings.
    pub google: LoginChannelConfig,

    /// Facebook login channel settings.
    pub facebook: LoginChannelConfig,
}

impl Default for EmbeddedAdapterConfig {
    fn default() -> Self {
        Self {
            display_name: "Wallet Console".to_string(),
            mfa_level: "default".to_string(),
            google: LoginChannelConfig {
                verifier: "demo-google-verifier".to_string(),
                oauth_client_id: String::new(),
                key_env: "WALLET_CONSOLE_GOOGLE_KEY".to_string(),
                dev_key: None,
            },
            facebook: LoginChannelConfig {
                verifier: "demo-facebook-verifier".to_string(),
                oauth_client_id: String::new(),
                key_env: "WALLET_CONSOLE_FACEBOOK_KEY".to_string(),
                dev_key: None,
            },
        }
    }
}

/// One social login channel registered with the key-management provider.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginChannelConfig {
    /// Verifier name registered on the provider dashboard.
    pub verifier: String,

    /// OAuth client id for this channel.
    pub oauth_client_id: String,

    /// Environment variable the account private key is read from.
    pub key_env: String,

    /// Inline private key for local development only. Used only when the
    /// environment variable is unset.
    pub dev_key: Option<String>,
}

/// Settings for the external wallet node adapter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeAdapterConfig {
    /// JSON-RPC endpoint of the node holding unlocked accounts.
    pub endpoint: String,

    /// Timeout for the connect-time account query, in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for NodeAdapterConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8545".to_string(),
            connect_timeout_secs: 30,
        }
    }
}
