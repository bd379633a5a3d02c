//! Reconnect retry policy.
//!
//! # Responsibilities
//! - Decide how long to wait before the next reconnect attempt
//! - Enforce an optional bound on consecutive failed attempts
//!
//! # Design Decisions
//! - Default is a fixed 5 second delay with no attempt bound, so the
//!   watcher keeps trying a dead endpoint forever unless configured otherwise
//! - The attempt counter is owned by the caller and reset after a session
//!   reaches the subscribed state

use std::time::Duration;

use crate::config::schema::{BackoffKind, RetryConfig};
use crate::resilience::backoff::{calculate_backoff, with_jitter};

/// Delay growth between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed,
    Exponential { max_delay: Duration },
}

/// Reconnect schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    interval: Duration,
    max_attempts: Option<u32>,
    backoff: Backoff,
    jitter: bool,
}

impl RetryPolicy {
    /// Same delay forever.
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
            backoff: Backoff::Fixed,
            jitter: false,
        }
    }

    /// Doubling delay starting at `interval`, capped at `max_delay`.
    pub fn exponential(interval: Duration, max_delay: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
            backoff: Backoff::Exponential { max_delay },
            jitter: false,
        }
    }

    /// Give up after `max_attempts` consecutive failures.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Delay before retry number `attempt` (1-based), or `None` when the
    /// policy is exhausted.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if let Some(max) = self.max_attempts {
            if attempt > max {
                return None;
            }
        }

        let delay = match self.backoff {
            Backoff::Fixed => self.interval,
            Backoff::Exponential { max_delay } => calculate_backoff(
                attempt.max(1),
                self.interval.as_millis() as u64,
                max_delay.as_millis() as u64,
            ),
        };

        Some(if self.jitter { with_jitter(delay) } else { delay })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(Duration::from_secs(5))
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        let interval = Duration::from_millis(config.interval_ms);
        let policy = match config.backoff {
            BackoffKind::Fixed => Self::fixed(interval),
            BackoffKind::Exponential => {
                Self::exponential(interval, Duration::from_millis(config.max_delay_ms))
            }
        };
        let policy = policy.with_jitter(config.jitter);

        match config.max_attempts {
            Some(max) => policy.with_max_attempts(max),
            None => policy,
        }
    }
}
