//! Notification delivery subsystem.
//!
//! # Data Flow
//! ```text
//! MintEvent
//!     → format.rs (base units → decimal string, Markdown caption)
//!     → telegram.rs (sendMessage / sendAnimation POST)
//!     → NotifyOutcome (never an error)
//! ```
//!
//! # Design Decisions
//! - One HTTP call per event: no retry, no idempotency key
//! - Failures are logged and returned as values so the watcher has no
//!   failure-handling path for delivery

pub mod format;
pub mod telegram;

use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::types::MintEvent;

pub use format::{format_units, MessageTemplate};
pub use telegram::{NotifyError, TelegramNotifier, TelegramPayload};

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Delivered,
    Failed(String),
}

impl NotifyOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, NotifyOutcome::Delivered)
    }
}

/// Delivers Mint notifications.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn notify(&self, event: &MintEvent) -> NotifyOutcome;
}

#[async_trait]
impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    async fn notify(&self, event: &MintEvent) -> NotifyOutcome {
        (**self).notify(event).await
    }
}
