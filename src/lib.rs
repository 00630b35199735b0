//! Wallet console library.
//!
//! A terminal application for authenticating a wallet session through one of
//! two interchangeable login adapters — an embedded key-management adapter
//! (social login channels) or an external wallet node — and running basic
//! chain operations against whichever session is connected.

pub mod adapter;
pub mod config;
pub mod console;
pub mod rpc;
pub mod session;

pub use adapter::{AdapterKind, ConnectParams, LoginProvider, ProviderHandle, WalletAdapter};
pub use config::AppConfig;
pub use rpc::ChainRpc;
pub use session::AuthOrchestrator;
