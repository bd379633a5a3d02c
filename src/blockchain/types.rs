//! Chain-specific types and error definitions.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A decoded `Mint` log. Consumed by the notifier and then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintEvent {
    /// Recipient of the minted tokens.
    pub minter: Address,
    /// Minted amount in base units.
    pub amount: U256,
    /// Paired deposit amount, for contracts that emit one.
    pub deposit: Option<U256>,
    /// Transaction hash, when the transport exposes log metadata.
    pub tx_hash: Option<String>,
    /// Block number where the event occurred.
    pub block_number: Option<u64>,
}

/// Errors that can occur while talking to the node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockchainError {
    /// The endpoint string cannot be turned into a connection.
    #[error("Invalid RPC endpoint: {0}")]
    InvalidEndpoint(String),

    /// Establishing the streaming connection failed.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Binding the event subscription failed.
    #[error("Subscription failed: {0}")]
    Subscribe(String),

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// The live stream reported a transport-level error.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;
