//! Console subsystem: the user-facing view.
//!
//! # Design Decisions
//! - The command surface is a pure function of authentication state; the
//!   authenticated and unauthenticated sets are mutually exclusive
//! - Every result and every error is printed; there is no silent path

pub mod repl;
pub mod view;

pub use repl::Console;
pub use view::{commands_for, parse_command, Command};
