//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Subscription lost:
//!     → retries.rs (policy: next delay or give up)
//!     → backoff.rs (exponential growth, jitter)
//! ```
//!
//! # Design Decisions
//! - Retry timing is a value, not a constant buried in the watcher
//! - Fixed interval, no attempt bound by default

pub mod backoff;
pub mod retries;

pub use retries::{Backoff, RetryPolicy};
