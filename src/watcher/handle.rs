//! The live connection handle.

use std::time::Instant;

use crate::watcher::transport::MintSession;

/// Owns the single live session. Exactly one handle is attached to a
/// watcher at a time; it must be detached before a new one is attached.
pub struct ConnectionHandle<S: MintSession> {
    session: S,
    generation: u64,
    opened_at: Instant,
}

impl<S: MintSession> ConnectionHandle<S> {
    pub fn new(session: S, generation: u64) -> Self {
        Self {
            session,
            generation,
            opened_at: Instant::now(),
        }
    }

    /// Monotonic connection counter, starting at 1.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// Remove the listener and close the connection.
    pub async fn detach(mut self) {
        self.session.close().await;
        tracing::debug!(
            generation = self.generation,
            uptime_secs = self.opened_at.elapsed().as_secs(),
            "Connection handle detached"
        );
    }
}

impl<S: MintSession> std::fmt::Debug for ConnectionHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("generation", &self.generation)
            .field("uptime_secs", &self.opened_at.elapsed().as_secs())
            .finish()
    }
}
