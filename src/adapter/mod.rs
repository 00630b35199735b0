//! Login adapter subsystem.
//!
//! # Data Flow
//! ```text
//! AdapterKind + ConnectParams
//!     → embedded.rs (key material from env/config, local signer)
//!     → node.rs (accounts and signing delegated to an external node)
//!     → ProviderHandle (capability object for the authenticated session)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables (or an explicit dev key)
//! - Never log private keys or sensitive data
//! - The node adapter never sees key material at all

pub mod embedded;
pub mod handle;
pub mod node;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::schema::{AppConfig, ChainConfig};
pub use embedded::EmbeddedKeyAdapter;
pub use handle::ProviderHandle;
pub use node::NodeWalletAdapter;

/// Which of the two interchangeable login adapters to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterKind {
    /// Embedded key-management adapter (social login channels).
    Embedded,
    /// External wallet node adapter (accounts held by the node).
    Node,
}

impl std::fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdapterKind::Embedded => write!(f, "embedded"),
            AdapterKind::Node => write!(f, "node"),
        }
    }
}

/// Social login channel for the embedded adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginProvider {
    Google,
    Facebook,
}

impl std::fmt::Display for LoginProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginProvider::Google => write!(f, "google"),
            LoginProvider::Facebook => write!(f, "facebook"),
        }
    }
}

impl std::str::FromStr for LoginProvider {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(LoginProvider::Google),
            "facebook" => Ok(LoginProvider::Facebook),
            other => Err(AdapterError::UnknownLoginProvider(other.to_string())),
        }
    }
}

/// Caller-supplied parameters for a connect attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectParams {
    /// Login channel, required by the embedded adapter.
    pub login_provider: Option<LoginProvider>,
}

impl ConnectParams {
    /// Parameters for a social login through the embedded adapter.
    pub fn social(provider: LoginProvider) -> Self {
        Self {
            login_provider: Some(provider),
        }
    }
}

/// Profile information reported for the authenticated session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserInfo {
    /// Display name, when the login surface provides one.
    pub name: Option<String>,
    /// Email address, when the login surface provides one.
    pub email: Option<String>,
    /// Login channel that produced the session.
    pub login_provider: Option<LoginProvider>,
    /// Verifier the session was established against.
    pub verifier: Option<String>,
    /// Account addresses of the session, checksummed.
    pub addresses: Vec<String>,
}

/// Errors produced by adapter construction, init, and connect.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Adapter settings are unusable.
    #[error("adapter configuration error: {0}")]
    Config(String),

    /// `connect` was called before `init`.
    #[error("adapter not initialized")]
    NotInitialized,

    /// The embedded adapter needs a login channel choice.
    #[error("connect requires a login provider (google or facebook)")]
    LoginProviderRequired,

    /// Login channel name not recognized.
    #[error("unknown login provider '{0}'")]
    UnknownLoginProvider(String),

    /// No private key available for the requested channel.
    #[error("no key material for {channel}: environment variable {key_env} not set")]
    KeyMissing { channel: String, key_env: String },

    /// Key material present but unparseable.
    #[error("invalid private key for {channel}")]
    InvalidKey { channel: String },

    /// The wallet node exposes no unlocked accounts.
    #[error("wallet node at {endpoint} reports no accounts")]
    NoAccounts { endpoint: String },

    /// Connect-time RPC failure against the adapter's endpoint.
    #[error("connect failed: {0}")]
    Connect(String),

    /// Logout-side failure reported by the adapter.
    #[error("logout failed: {0}")]
    Logout(String),
}

/// One pluggable login strategy: the capability set the session
/// orchestrator depends on, independent of which adapter is behind it.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    /// Which kind of adapter this is.
    fn kind(&self) -> AdapterKind;

    /// Bind the adapter to a chain and prepare its transport.
    async fn init(&mut self, chain: &ChainConfig) -> Result<(), AdapterError>;

    /// Establish an authenticated connection, yielding the provider handle.
    async fn connect(&mut self, params: &ConnectParams) -> Result<ProviderHandle, AdapterError>;

    /// Tear down the adapter-side session.
    async fn logout(&mut self) -> Result<(), AdapterError>;

    /// Profile information for the connected session.
    async fn user_info(&self) -> Result<UserInfo, AdapterError>;
}

/// Construct the adapter for `kind` from application configuration.
pub fn build_adapter(
    kind: AdapterKind,
    config: &AppConfig,
) -> Result<Box<dyn WalletAdapter>, AdapterError> {
    match kind {
        AdapterKind::Embedded => Ok(Box::new(EmbeddedKeyAdapter::new(config.embedded.clone()))),
        AdapterKind::Node => Ok(Box::new(NodeWalletAdapter::new(config.node.clone())?)),
    }
}
