//! Chain RPC helper bound to the current provider handle.
//!
//! # Responsibilities
//! - Read chain id, accounts, balance for the session
//! - Send transactions and sign messages through the session's signer
//! - Export the session private key when it is held locally
//! - Wrap every provider call in a timeout

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{hex, Address, Bytes, TxHash, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use alloy::signers::Signer;
use alloy::transports::TransportError;
use thiserror::Error;
use tokio::time::timeout;

use crate::adapter::ProviderHandle;

/// Errors from chain RPC operations.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Provider call failed.
    #[error("RPC error: {0}")]
    Provider(String),

    /// Provider call timed out.
    #[error("{what} timed out after {secs} seconds")]
    Timeout { what: &'static str, secs: u64 },

    /// The session has no accounts to act as.
    #[error("session has no accounts")]
    NoAccount,

    /// Transaction submission failed.
    #[error("transaction failed: {0}")]
    Transaction(String),

    /// Message signing failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The session key is held by the wallet node, not this process.
    #[error("private key export is not supported for node wallet sessions")]
    KeyExportUnsupported,
}

/// Per-action RPC helper. Constructed fresh for every console action with
/// the provider handle current at that moment.
pub struct ChainRpc {
    handle: Arc<ProviderHandle>,
    timeout: Duration,
}

impl ChainRpc {
    /// Bind a helper to the session handle.
    pub fn new(handle: Arc<ProviderHandle>, timeout: Duration) -> Self {
        Self { handle, timeout }
    }

    async fn call<T>(
        &self,
        what: &'static str,
        fut: impl Future<Output = Result<T, TransportError>>,
    ) -> Result<T, RpcError> {
        match timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(RpcError::Provider(format!("{what} failed: {e}"))),
            Err(_) => Err(RpcError::Timeout {
                what,
                secs: self.timeout.as_secs(),
            }),
        }
    }

    fn primary_account(&self) -> Result<Address, RpcError> {
        self.handle.primary_account().ok_or(RpcError::NoAccount)
    }

    /// Chain id reported by the session's provider.
    pub async fn get_chain_id(&self) -> Result<u64, RpcError> {
        let provider = self.handle.provider();
        self.call("chain id query", async { provider.get_chain_id().await })
            .await
    }

    /// Account addresses of the session.
    ///
    /// Embedded sessions answer locally (the key defines the one account);
    /// node sessions ask the node for its unlocked accounts.
    pub async fn get_accounts(&self) -> Result<Vec<Address>, RpcError> {
        if self.handle.has_local_key() {
            return Ok(self.handle.accounts().to_vec());
        }
        let provider = self.handle.provider();
        self.call("account query", async { provider.get_accounts().await })
            .await
    }

    /// Native balance of the primary account, in wei.
    pub async fn get_balance(&self) -> Result<U256, RpcError> {
        let account = self.primary_account()?;
        let provider = self.handle.provider();
        self.call("balance query", async {
            provider.get_balance(account).await
        })
        .await
    }

    /// Send a native-token transfer. Returns the broadcast transaction hash.
    pub async fn send_transaction(&self, to: Address, value: U256) -> Result<TxHash, RpcError> {
        let from = self.primary_account()?;
        let provider = self.handle.provider();

        if self.handle.has_local_key() {
            // The wallet filler on the provider signs locally and fills
            // nonce/gas before broadcast.
            let tx = TransactionRequest::default().with_to(to).with_value(value);
            let pending = self
                .call("transaction broadcast", async {
                    provider.send_transaction(tx).await
                })
                .await
                .map_err(|e| match e {
                    RpcError::Provider(msg) => RpcError::Transaction(msg),
                    other => other,
                })?;
            Ok(*pending.tx_hash())
        } else {
            // The node owns the key; hand it the full request to sign.
            let tx = TransactionRequest::default()
                .with_from(from)
                .with_to(to)
                .with_value(value);
            self.call("transaction submission", async {
                provider
                    .raw_request::<_, TxHash>("eth_sendTransaction".into(), (tx,))
                    .await
            })
            .await
            .map_err(|e| match e {
                RpcError::Provider(msg) => RpcError::Transaction(msg),
                other => other,
            })
        }
    }

    /// Sign a message (EIP-191 personal sign). Returns the 0x-hex signature.
    pub async fn sign_message(&self, message: &[u8]) -> Result<String, RpcError> {
        if let Some(signer) = self.handle.signer() {
            let sig = signer
                .sign_message(message)
                .await
                .map_err(|e| RpcError::Signing(e.to_string()))?;
            return Ok(format!("0x{}", hex::encode(sig.as_bytes())));
        }

        let account = self.primary_account()?;
        let data = Bytes::from(message.to_vec());
        let provider = self.handle.provider();
        let sig: Bytes = self
            .call("message signing", async {
                provider
                    .raw_request("personal_sign".into(), (data, account))
                    .await
            })
            .await
            .map_err(|e| match e {
                RpcError::Provider(msg) => RpcError::Signing(msg),
                other => other,
            })?;
        Ok(sig.to_string())
    }

    /// Export the session private key as 0x-hex.
    ///
    /// Only embedded sessions hold the key in this process; node sessions
    /// get a typed refusal.
    pub fn export_private_key(&self) -> Result<String, RpcError> {
        match self.handle.signer() {
            Some(signer) => Ok(format!("0x{}", hex::encode(signer.to_bytes()))),
            None => Err(RpcError::KeyExportUnsupported),
        }
    }
}
