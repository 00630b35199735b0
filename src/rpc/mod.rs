//! Chain RPC subsystem.
//!
//! # Data Flow
//! ```text
//! ProviderHandle (current session)
//!     → helper.rs (ChainRpc, built fresh per console action)
//!     → alloy provider / local signer
//! ```
//!
//! # Design Decisions
//! - Every provider call is wrapped in a timeout; a hung endpoint surfaces
//!   as a typed error instead of hanging the console
//! - Errors are returned to the caller unclassified beyond timeout; the
//!   console prints them

pub mod helper;

pub use helper::{ChainRpc, RpcError};
