//! Provider handle: the capability object of an authenticated session.

use alloy::primitives::Address;
use alloy::providers::DynProvider;
use alloy::signers::local::PrivateKeySigner;

use crate::adapter::AdapterKind;
use crate::config::schema::ChainConfig;

/// Capability object returned by a successful connect.
///
/// Its presence is the sole discriminator between the authenticated and
/// unauthenticated console states. At most one handle is active at a time;
/// the session orchestrator enforces this.
pub struct ProviderHandle {
    /// Adapter kind that produced this handle.
    kind: AdapterKind,
    /// Chain the session is bound to.
    chain: ChainConfig,
    /// Type-erased provider for RPC calls.
    provider: DynProvider,
    /// Account addresses of the session.
    accounts: Vec<Address>,
    /// Local signer, present only for embedded-key sessions.
    signer: Option<PrivateKeySigner>,
}

impl ProviderHandle {
    /// Assemble a handle from its parts.
    pub fn new(
        kind: AdapterKind,
        chain: ChainConfig,
        provider: DynProvider,
        accounts: Vec<Address>,
        signer: Option<PrivateKeySigner>,
    ) -> Self {
        Self {
            kind,
            chain,
            provider,
            accounts,
            signer,
        }
    }

    /// Adapter kind that produced this handle.
    pub fn kind(&self) -> AdapterKind {
        self.kind
    }

    /// Chain configuration the session is bound to.
    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    /// The underlying provider.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// All account addresses of the session.
    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    /// The first account, used as the default sender/signer identity.
    pub fn primary_account(&self) -> Option<Address> {
        self.accounts.first().copied()
    }

    /// Local signer, when the key material is held in this process.
    pub fn signer(&self) -> Option<&PrivateKeySigner> {
        self.signer.as_ref()
    }

    /// Whether the session key lives in this process (exportable).
    pub fn has_local_key(&self) -> bool {
        self.signer.is_some()
    }
}

impl std::fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("kind", &self.kind)
            .field("chain_id", &self.chain.chain_id)
            .field("accounts", &self.accounts)
            .field("local_key", &self.signer.is_some())
            .finish()
    }
}
