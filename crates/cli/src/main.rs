//! relaybot CLI — the main entry point.
//!
//! Commands:
//! - `serve`    — Start the HTTP webhook server
//! - `status`   — Show the effective configuration
//! - `doctor`   — Diagnose configuration and upstream reachability
//! - `context`  — Print the instruction prompt for a given instant

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "relaybot",
    about = "relaybot — Telegram and web chat relay for a business assistant",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.relaybot/config.toml)
    #[arg(short, long, global = true, env = "RELAYBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP webhook server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the effective configuration
    Status,

    /// Diagnose configuration and upstream reachability
    Doctor,

    /// Print the system prompt the assistant would receive
    Context {
        /// Instant to evaluate, RFC 3339 (default: now)
        #[arg(long)]
        at: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Serve { port } => commands::serve::run(config_path, port).await?,
        Commands::Status => commands::status::run(config_path).await?,
        Commands::Doctor => commands::doctor::run(config_path).await?,
        Commands::Context { at } => commands::context::run(config_path, at.as_deref()).await?,
    }

    Ok(())
}
