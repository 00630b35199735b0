//! wallet-console entry point.
//!
//! # Flow
//! ```text
//! startup (tracing, clap, config load + validation)
//!     → AuthOrchestrator (session state machine)
//!     → Console (REPL or one-shot --exec)
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wallet_console::config::validation::validate_config;
use wallet_console::config::{load_config, AppConfig};
use wallet_console::console::Console;
use wallet_console::AuthOrchestrator;

#[derive(Parser)]
#[command(name = "wallet-console")]
#[command(about = "Wallet login and chain RPC console", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured network entry by name.
    #[arg(short, long)]
    network: Option<String>,

    /// Execute a single console command and exit.
    #[arg(short, long)]
    exec: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallet_console=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    if let Some(network) = cli.network {
        config.default_network = network;
    }

    // The network override can invalidate an otherwise valid config.
    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            tracing::error!(field = %error.field, message = %error.message, "Invalid configuration");
        }
        return Err("configuration rejected".into());
    }

    let chain = config
        .active_chain()
        .cloned()
        .ok_or("no active chain entry")?;

    tracing::info!(
        client_id = %config.client_id,
        network = %config.default_network,
        chain_id = chain.chain_id,
        rpc_timeout_secs = config.rpc_timeout_secs,
        "Configuration loaded"
    );

    let rpc_timeout = Duration::from_secs(config.rpc_timeout_secs);
    let orchestrator = Arc::new(AuthOrchestrator::new(Arc::new(config), chain));
    let console = Console::new(orchestrator, rpc_timeout);

    match cli.exec {
        Some(line) => {
            console.execute_line(&line).await;
        }
        None => console.run().await?,
    }

    Ok(())
}
