//! WebSocket transport built on alloy.
//!
//! # Responsibilities
//! - Connect to a streaming JSON-RPC endpoint
//! - Bind an `eth_subscribe("logs")` filter for the Mint event
//! - Decode incoming logs and report stream closure
//! - Bound connect and identity calls with a timeout

use alloy::providers::{Provider, ProviderBuilder, WsConnect};
use alloy::pubsub::Subscription;
use alloy::rpc::types::Log;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::timeout;

use crate::blockchain::events::{decode_mint, mint_filter};
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::watcher::transport::{MintSession, MintTransport, SessionEvent};
use crate::watcher::types::WatchTarget;

/// Opens alloy WebSocket sessions.
#[derive(Debug, Clone)]
pub struct AlloyTransport {
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl AlloyTransport {
    pub fn new(timeout_duration: Duration) -> Self {
        Self { timeout_duration }
    }
}

impl Default for AlloyTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

/// Parse and check a streaming endpoint.
pub fn parse_ws_endpoint(endpoint: &str) -> BlockchainResult<url::Url> {
    let url: url::Url = endpoint
        .parse()
        .map_err(|e| BlockchainError::InvalidEndpoint(format!("cannot parse endpoint: {}", e)))?;

    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(BlockchainError::InvalidEndpoint(format!(
            "'{}' uses scheme '{}', expected ws or wss",
            url.host_str().unwrap_or_default(),
            other
        ))),
    }
}

#[async_trait]
impl MintTransport for AlloyTransport {
    type Session = AlloySession;

    async fn open(&self, target: &WatchTarget) -> BlockchainResult<AlloySession> {
        let url = parse_ws_endpoint(&target.endpoint)?;
        let secs = self.timeout_duration.as_secs();

        tracing::debug!(host = url.host_str().unwrap_or_default(), "Opening WebSocket connection");

        // The watcher owns reconnection; alloy must not resubscribe behind it.
        let ws = WsConnect::new(url.as_str()).with_max_retries(0);
        let provider = match timeout(self.timeout_duration, ProviderBuilder::new().connect_ws(ws))
        .await
        {
            Ok(Ok(provider)) => provider,
            Ok(Err(e)) => return Err(BlockchainError::Connect(e.to_string())),
            Err(_) => return Err(BlockchainError::Timeout(secs)),
        };
        let provider: Arc<dyn Provider + Send + Sync> = Arc::new(provider);

        let filter = mint_filter(target.contract);
        let subscription = match timeout(self.timeout_duration, provider.subscribe_logs(&filter)).await {
            Ok(Ok(subscription)) => subscription,
            Ok(Err(e)) => return Err(BlockchainError::Subscribe(e.to_string())),
            Err(_) => return Err(BlockchainError::Timeout(secs)),
        };

        Ok(AlloySession {
            provider: Some(provider),
            subscription: Some(subscription),
            timeout_duration: self.timeout_duration,
        })
    }
}

/// A live alloy log subscription.
pub struct AlloySession {
    provider: Option<Arc<dyn Provider + Send + Sync>>,
    subscription: Option<Subscription<Log>>,
    timeout_duration: Duration,
}

#[async_trait]
impl MintSession for AlloySession {
    async fn chain_id(&mut self) -> BlockchainResult<ChainId> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| BlockchainError::Transport("session closed".to_string()))?;

        match timeout(self.timeout_duration, provider.get_chain_id()).await {
            Ok(Ok(id)) => Ok(ChainId::from(id)),
            Ok(Err(e)) => Err(BlockchainError::Rpc(e.to_string())),
            Err(_) => Err(BlockchainError::Timeout(self.timeout_duration.as_secs())),
        }
    }

    async fn next_event(&mut self) -> SessionEvent {
        loop {
            let Some(subscription) = self.subscription.as_mut() else {
                return SessionEvent::Closed;
            };

            let log = match subscription.recv().await {
                Ok(log) => log,
                Err(RecvError::Closed) => return SessionEvent::Closed,
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Subscription lagged, Mint logs were dropped");
                    continue;
                }
            };

            match decode_mint(&log) {
                Some(event) => return SessionEvent::Mint(event),
                None => tracing::debug!(
                    tx_hash = ?log.transaction_hash,
                    removed = log.removed,
                    "Skipping log that is not a live Mint event"
                ),
            }
        }
    }

    async fn close(&mut self) {
        // Dropping the subscription unregisters the listener; dropping the
        // last provider reference shuts the WebSocket backend down.
        self.subscription = None;
        self.provider = None;
    }
}

impl std::fmt::Debug for AlloySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlloySession")
            .field("open", &self.subscription.is_some())
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
