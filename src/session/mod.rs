//! Session subsystem: the authentication orchestrator.
//!
//! # State Machine
//! ```text
//! Disconnected ──login──▶ Connecting ──connect ok──▶ Authenticated
//!      ▲                      │                           │
//!      │◀──connect err────────┘                           │
//!      │◀──────────────────logout─────────────────────────┘
//! ```
//!
//! # Design Decisions
//! - One unified `login` entry point for every login trigger; the adapter is
//!   always constructed and initialized before connecting
//! - Single-writer discipline: a login while another is in flight is rejected,
//!   not raced
//! - Construction and connect failures are typed and propagate to the caller

pub mod orchestrator;

pub use orchestrator::{AuthOrchestrator, SessionError};
