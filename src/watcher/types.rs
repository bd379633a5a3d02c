//! Watcher types and error definitions.

use alloy::primitives::Address;
use thiserror::Error;

use crate::blockchain::types::BlockchainError;
use crate::config::ChainConfig;

/// What the watcher subscribes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    /// Streaming RPC endpoint.
    pub endpoint: String,
    /// Contract emitting `Mint`.
    pub contract: Address,
    /// Chain ID the node must report, if pinned.
    pub expected_chain_id: Option<u64>,
}

impl WatchTarget {
    /// Build a target from validated chain configuration.
    pub fn from_config(config: &ChainConfig) -> Result<Self, WatchError> {
        let endpoint = config.rpc_url.trim();
        if endpoint.is_empty() {
            return Err(WatchError::InvalidTarget("RPC endpoint is empty".to_string()));
        }

        let contract = config
            .contract_address
            .trim()
            .parse::<Address>()
            .map_err(|e| WatchError::InvalidTarget(format!("Invalid contract address: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            contract,
            expected_chain_id: config.expected_chain_id,
        })
    }
}

/// Lifecycle state of the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Disconnected,
    Connecting,
    Subscribed,
}

impl WatcherState {
    /// Gauge value exported for this state.
    pub fn as_metric(self) -> f64 {
        match self {
            WatcherState::Disconnected => 0.0,
            WatcherState::Connecting => 1.0,
            WatcherState::Subscribed => 2.0,
        }
    }
}

/// Errors surfaced by the chain watcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WatchError {
    /// Node-level failure; always transient.
    #[error(transparent)]
    Chain(#[from] BlockchainError),

    /// The watch target could not be built from configuration.
    #[error("Invalid watch target: {0}")]
    InvalidTarget(String),

    /// A new handle was attached while the previous one was still live.
    #[error("Connection handle {generation} is still attached")]
    AlreadyAttached { generation: u64 },

    /// A bounded retry policy gave up.
    #[error("Gave up after {attempts} failed connection attempts")]
    RetriesExhausted { attempts: u32 },
}
