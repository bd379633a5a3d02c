//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order from a validated config
//! - Start the metrics endpoint and signal handler
//! - Run the chain watcher until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Configuration is validated by the caller before anything here runs

use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

use crate::blockchain::AlloyTransport;
use crate::config::BotConfig;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::spawn_signal_handler;
use crate::notify::{MessageTemplate, NotifyError, TelegramNotifier};
use crate::observability::metrics;
use crate::resilience::RetryPolicy;
use crate::watcher::{ChainWatcher, WatchError, WatchTarget};

/// Errors that end the process after startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Watcher failed: {0}")]
    Watch(#[from] WatchError),

    #[error("Notifier setup failed: {0}")]
    Notifier(#[from] NotifyError),

    #[error("Watcher task aborted: {0}")]
    Task(String),
}

/// Build every component and run the watcher until shutdown.
pub async fn run(config: BotConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let target = WatchTarget::from_config(&config.chain)?;
    let template = MessageTemplate::new(&config.token, &config.telegram);
    let notifier = TelegramNotifier::new(&config.telegram, template)?;
    let transport = AlloyTransport::new(Duration::from_secs(config.chain.rpc_timeout_secs));
    let policy = RetryPolicy::from(&config.retry);

    tracing::info!(
        contract = %target.contract,
        expected_chain_id = ?target.expected_chain_id,
        retry = ?policy,
        animation = config.telegram.animation_url.is_some(),
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let watcher = ChainWatcher::new(transport, notifier, target, policy);
    let task = watcher.start(shutdown.subscribe());
    let signals = spawn_signal_handler(shutdown);

    let result = task.await.map_err(|e| StartupError::Task(e.to_string()))?;
    signals.abort();

    result.map_err(StartupError::from)
}
