//! Interactive console loop.
//!
//! Reads lines, dispatches parsed commands to the session orchestrator and
//! the RPC helper, and prints every result and error. Nothing is swallowed:
//! the console is the application's only user-facing surface.

use std::sync::Arc;
use std::time::Duration;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::console::view::{commands_for, is_available, parse_command, Command, ParseError};
use crate::rpc::ChainRpc;
use crate::session::AuthOrchestrator;

/// The console: session orchestrator plus the RPC timeout applied to
/// per-action helpers.
pub struct Console {
    orchestrator: Arc<AuthOrchestrator>,
    rpc_timeout: Duration,
}

impl Console {
    /// Create the console around an orchestrator.
    pub fn new(orchestrator: Arc<AuthOrchestrator>, rpc_timeout: Duration) -> Self {
        Self {
            orchestrator,
            rpc_timeout,
        }
    }

    /// Run the interactive loop until quit or end of input.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let chain = self.orchestrator.chain();
        println!(
            "wallet-console — {} (chain id {})",
            chain.display_name, chain.chain_id
        );
        println!("Type 'help' for the available commands.");

        let mut editor = DefaultEditor::new()?;
        loop {
            let prompt = format!("[{}]> ", self.orchestrator.state_name().await);
            match editor.readline(&prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let _ = editor.add_history_entry(line.as_str());
                    if !self.execute_line(&line).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("(interrupted — 'quit' to exit)");
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(Box::new(e)),
            }
        }
        Ok(())
    }

    /// Execute one console line. Returns false when the console should exit.
    pub async fn execute_line(&self, line: &str) -> bool {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(ParseError::Empty) => return true,
            Err(e) => {
                println!("{e}");
                return true;
            }
        };

        let authenticated = self.orchestrator.is_authenticated().await;
        if !is_available(&command, authenticated) {
            // Commands from the other set short-circuit here; no adapter or
            // chain call happens.
            if authenticated {
                println!("already authenticated — 'logout' first");
            } else {
                println!("not authenticated — log in first (try 'help')");
            }
            return true;
        }

        self.dispatch(command).await
    }

    async fn dispatch(&self, command: Command) -> bool {
        match command {
            Command::Help => {
                let authenticated = self.orchestrator.is_authenticated().await;
                for spec in commands_for(authenticated) {
                    println!("  {:24} {}", spec.usage, spec.help);
                }
                println!("  {:24} {}", "help", "show this list");
                println!("  {:24} {}", "quit", "exit the console");
            }
            Command::Quit => return false,
            Command::Login(kind, params) => {
                match self.orchestrator.login(kind, params).await {
                    Ok(handle) => match handle.primary_account() {
                        Some(address) => println!("connected as {address} via {kind}"),
                        None => println!("connected via {kind}"),
                    },
                    Err(e) => println!("login failed: {e}"),
                }
            }
            Command::Logout => match self.orchestrator.logout().await {
                Ok(()) => println!("logged out"),
                Err(e) => println!("logout failed: {e}"),
            },
            Command::UserInfo => match self.orchestrator.user_info().await {
                Ok(info) => match serde_json::to_string_pretty(&info) {
                    Ok(rendered) => println!("{rendered}"),
                    Err(e) => println!("user info unrenderable: {e}"),
                },
                Err(e) => println!("user info failed: {e}"),
            },
            Command::ChainId => match self.rpc().await {
                Some(rpc) => match rpc.get_chain_id().await {
                    Ok(id) => println!("chain id: {id}"),
                    Err(e) => println!("{e}"),
                },
                None => {}
            },
            Command::Accounts => match self.rpc().await {
                Some(rpc) => match rpc.get_accounts().await {
                    Ok(accounts) => {
                        for account in accounts {
                            println!("{account}");
                        }
                    }
                    Err(e) => println!("{e}"),
                },
                None => {}
            },
            Command::Balance => match self.rpc().await {
                Some(rpc) => match rpc.get_balance().await {
                    Ok(balance) => println!("balance: {balance} wei"),
                    Err(e) => println!("{e}"),
                },
                None => {}
            },
            Command::Send { to, value } => match self.rpc().await {
                Some(rpc) => match rpc.send_transaction(to, value).await {
                    Ok(hash) => println!("transaction sent: {hash:#x}"),
                    Err(e) => println!("{e}"),
                },
                None => {}
            },
            Command::Sign { message } => match self.rpc().await {
                Some(rpc) => match rpc.sign_message(message.as_bytes()).await {
                    Ok(signature) => println!("signature: {signature}"),
                    Err(e) => println!("{e}"),
                },
                None => {}
            },
            Command::ExportKey => match self.rpc().await {
                Some(rpc) => match rpc.export_private_key() {
                    Ok(key) => println!("{key}"),
                    Err(e) => println!("{e}"),
                },
                None => {}
            },
        }
        true
    }

    /// RPC helper for the current session, built fresh per action.
    async fn rpc(&self) -> Option<ChainRpc> {
        match self.orchestrator.provider().await {
            Some(handle) => Some(ChainRpc::new(handle, self.rpc_timeout)),
            None => {
                // The availability check normally prevents this; a session
                // can still vanish between check and dispatch.
                debug!("RPC action with no provider handle");
                println!("no active session");
                None
            }
        }
    }
}
