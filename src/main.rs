//! Contract Mint event notifier.
//!
//! Watches one contract for `Mint` events over a WebSocket subscription and
//! posts a Telegram message for each one.
//!
//! # Architecture Overview
//!
//! ```text
//!   env / .env / TOML ──▶ config ──▶ lifecycle::startup
//!                                          │
//!                                          ▼
//!   node (wss) ◀──── blockchain ◀──── watcher ────▶ notify ────▶ Telegram Bot API
//!                 (subscription)    (reconnect     (caption,
//!                                    loop)          POST)
//! ```
//!
//! # Exit Codes
//! - `0`: stopped by SIGINT/SIGTERM
//! - `1`: configuration incomplete, or a bounded retry policy gave up

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use mint_notifier::config::{load_config, ObservabilityConfig};
use mint_notifier::lifecycle::startup;
use mint_notifier::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "mint-notifier")]
#[command(about = "Forward contract Mint events to a Telegram chat", long_about = None)]
struct Args {
    /// Optional TOML file with tunables; environment variables override it.
    #[arg(short, long, env = "MINT_BOT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let loaded = load_config(args.config.as_deref());
    let observability = loaded
        .as_ref()
        .map(|config| config.observability.clone())
        .unwrap_or_else(|_| ObservabilityConfig::default());
    init_logging(&observability);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(
                error = %e,
                "CRITICAL ERROR: required configuration is missing or invalid"
            );
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("mint-notifier v{} starting", env!("CARGO_PKG_VERSION"));

    match startup::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Mint notifier stopped");
            ExitCode::FAILURE
        }
    }
}
