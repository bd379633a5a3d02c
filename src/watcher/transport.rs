//! Transport seam between the watcher and the node.
//!
//! A `MintTransport` opens one `MintSession` per connection cycle. Opening
//! covers both constructing the connection and binding the Mint filter, so a
//! session that exists is already subscribed.

use async_trait::async_trait;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId, MintEvent};
use crate::watcher::types::WatchTarget;

/// What a live session yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A decoded Mint log.
    Mint(MintEvent),
    /// Transport-level error. Ends the session.
    ///
    /// The alloy transport never yields this: a failed WebSocket surfaces as
    /// the subscription channel closing, which is reported as `Closed`.
    Error(BlockchainError),
    /// The stream closed. Ends the session.
    Closed,
}

/// Opens subscribed sessions against a node.
#[async_trait]
pub trait MintTransport: Send + Sync + 'static {
    type Session: MintSession;

    /// Connect to `target.endpoint` and bind the Mint event of `target.contract`.
    async fn open(&self, target: &WatchTarget) -> BlockchainResult<Self::Session>;
}

/// One live subscription.
#[async_trait]
pub trait MintSession: Send + 'static {
    /// Ask the node for its chain ID.
    async fn chain_id(&mut self) -> BlockchainResult<ChainId>;

    /// Wait for the next event on the subscription.
    ///
    /// Must be cancel safe: the watcher polls it alongside finished
    /// notification tasks and drops the future when one completes first.
    async fn next_event(&mut self) -> SessionEvent;

    /// Remove the event listener and close the connection.
    async fn close(&mut self);
}
