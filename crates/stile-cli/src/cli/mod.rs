//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use stile_core::config::Config;

mod commands;

#[derive(Parser)]
#[command(name = "stile")]
#[command(version)]
#[command(about = "Client-side login flow controller")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Authentication server base URL (overrides config)
    #[arg(long, env = "STILE_AUTH_URL")]
    server: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in and start a session
    Login {
        /// Identifier to log in with (prompted when omitted)
        #[arg(short, long)]
        username: Option<String>,

        /// Persist the session token for future launches
        #[arg(long)]
        remember: bool,
    },

    /// Clear the saved session
    Logout,

    /// Show session and lockout status
    Status,
}

pub fn run() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(server) = cli.server {
        config.auth_base_url = server;
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    match cli.command {
        Commands::Login { username, remember } => {
            runtime.block_on(commands::auth::login(&config, username, remember))
        }
        Commands::Logout => runtime.block_on(commands::auth::logout(&config)),
        Commands::Status => runtime.block_on(commands::auth::status(&config)),
    }
}

/// Initializes tracing on stderr. Respects RUST_LOG, defaults to warn
/// so command output owns stdout.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
