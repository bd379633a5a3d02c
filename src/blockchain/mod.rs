//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! WatchTarget (endpoint, contract)
//!     → client.rs (WebSocket connection, log subscription, chain id)
//!     → events.rs (Mint ABI, filter, log decoding)
//!     → MintEvent
//! ```
//!
//! # Constraints
//! - Endpoints often embed API keys; never log full URLs
//! - Connect and RPC calls have configurable timeouts
//! - Logs removed by a reorg are not reported

pub mod client;
pub mod events;
pub mod types;

pub use client::{AlloySession, AlloyTransport};
pub use events::{decode_mint, mint_filter};
pub use types::{BlockchainError, BlockchainResult, ChainId, MintEvent};
