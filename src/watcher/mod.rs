//! Chain watcher subsystem.
//!
//! # Data Flow
//! ```text
//! connect():
//!     detach previous handle
//!     → transport.open (connection + Mint filter)
//!     → attach new handle
//!     → chain_id confirmation → Subscribed
//!     → pump events → notification tasks (JoinSet)
//!
//! On close / error / failed confirmation:
//!     → Disconnected → RetryPolicy delay → connect()
//! ```
//!
//! # State Machine
//! ```text
//! Disconnected ──connect()──▶ Connecting ──chain id ok──▶ Subscribed
//!      ▲                          │                          │
//!      └──── open / identity fail ┘◀──── close / error ──────┘
//! ```
//!
//! # Design Decisions
//! - The watcher owns the only handle; there is no shared connection state
//! - Error and close both end the cycle; the loop schedules exactly one retry
//! - Notification failures never end a cycle

pub mod chain_watcher;
pub mod handle;
pub mod transport;
pub mod types;

pub use chain_watcher::ChainWatcher;
pub use handle::ConnectionHandle;
pub use transport::{MintSession, MintTransport, SessionEvent};
pub use types::{WatchError, WatchTarget, WatcherState};
