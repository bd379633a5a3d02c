//! Subscription lifecycle: connect, confirm, pump events, reconnect.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio::time::{sleep, timeout};

use crate::blockchain::types::{BlockchainError, ChainId, MintEvent};
use crate::notify::{Notifier, NotifyOutcome};
use crate::observability::metrics;
use crate::resilience::RetryPolicy;
use crate::watcher::handle::ConnectionHandle;
use crate::watcher::transport::{MintSession, MintTransport, SessionEvent};
use crate::watcher::types::{WatchError, WatchTarget, WatcherState};

/// Notification calls allowed to run at once before the pump waits for one.
const MAX_IN_FLIGHT: usize = 64;

/// How long shutdown waits for in-flight notifications.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(15);

/// Why a connection cycle ended.
#[derive(Debug)]
enum SessionEnd {
    /// Construction or subscription failed.
    ConnectFailed(WatchError),
    /// Chain ID request failed or did not match.
    IdentityFailed(WatchError),
    /// The subscribed stream reported an error.
    Errored(WatchError),
    /// The subscribed stream closed.
    Closed,
}

impl SessionEnd {
    fn reason(&self) -> &'static str {
        match self {
            SessionEnd::ConnectFailed(_) => "connect_failed",
            SessionEnd::IdentityFailed(_) => "identity_failed",
            SessionEnd::Errored(_) => "transport_error",
            SessionEnd::Closed => "closed",
        }
    }

    fn reached_subscribed(&self) -> bool {
        matches!(self, SessionEnd::Errored(_) | SessionEnd::Closed)
    }

    fn log(&self) {
        match self {
            SessionEnd::ConnectFailed(e) => {
                tracing::error!(error = %e, "Failed to connect to the RPC provider. Check RPC_URL")
            }
            SessionEnd::IdentityFailed(e) => {
                tracing::error!(error = %e, "Failed to confirm network identity")
            }
            SessionEnd::Errored(e) => tracing::warn!(error = %e, "Subscription transport error"),
            SessionEnd::Closed => tracing::warn!("Subscription connection closed"),
        }
    }
}

/// Keeps one Mint subscription alive and forwards events to the notifier.
///
/// Notifications run on their own tasks so a slow Bot API call never stops
/// the subscription from being read.
pub struct ChainWatcher<T: MintTransport, N: Notifier> {
    transport: T,
    notifier: Arc<N>,
    target: WatchTarget,
    policy: RetryPolicy,
    handle: Option<ConnectionHandle<T::Session>>,
    generation: u64,
    state: watch::Sender<WatcherState>,
    in_flight: JoinSet<()>,
}

impl<T: MintTransport, N: Notifier> ChainWatcher<T, N> {
    pub fn new(transport: T, notifier: N, target: WatchTarget, policy: RetryPolicy) -> Self {
        let (state, _) = watch::channel(WatcherState::Disconnected);
        Self {
            transport,
            notifier: Arc::new(notifier),
            target,
            policy,
            handle: None,
            generation: 0,
            state,
            in_flight: JoinSet::new(),
        }
    }

    /// Observe state transitions.
    pub fn state(&self) -> watch::Receiver<WatcherState> {
        self.state.subscribe()
    }

    /// Spawn the run loop. Consumes the watcher, so it can only start once.
    pub fn start(self, shutdown: broadcast::Receiver<()>) -> JoinHandle<Result<(), WatchError>> {
        tokio::spawn(self.run(shutdown))
    }

    /// Run until shutdown, or until a bounded retry policy gives up.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> Result<(), WatchError> {
        tracing::info!(
            contract = %self.target.contract,
            "Starting to monitor contract for Mint events"
        );

        let mut failures: u32 = 0;

        let result = loop {
            let ended = tokio::select! {
                end = self.connect() => Some(end),
                _ = shutdown.recv() => None,
            };
            let Some(end) = ended else {
                break Ok(());
            };

            self.set_state(WatcherState::Disconnected);
            end.log();

            if end.reached_subscribed() {
                failures = 0;
            }
            failures = failures.saturating_add(1);

            let Some(delay) = self.policy.delay_for(failures) else {
                tracing::error!(attempts = failures, "Retry policy exhausted, giving up");
                break Err(WatchError::RetriesExhausted { attempts: failures });
            };

            metrics::record_reconnect(end.reason());
            tracing::info!(
                delay_ms = delay.as_millis() as u64,
                attempt = failures,
                "Scheduling reconnect"
            );

            let cancelled = tokio::select! {
                _ = sleep(delay) => false,
                _ = shutdown.recv() => true,
            };
            if cancelled {
                break Ok(());
            }
        };

        self.detach().await;
        self.set_state(WatcherState::Disconnected);
        self.drain_notifications().await;
        tracing::info!("Chain watcher stopped");
        result
    }

    /// One connection cycle. Returns when the cycle ends for any reason.
    async fn connect(&mut self) -> SessionEnd {
        // Detach first so the old listener can never fire alongside the new one.
        self.detach().await;
        self.set_state(WatcherState::Connecting);

        let session = match self.transport.open(&self.target).await {
            Ok(session) => session,
            Err(e) => return SessionEnd::ConnectFailed(e.into()),
        };

        self.generation += 1;
        if let Err(e) = self.attach(ConnectionHandle::new(session, self.generation)) {
            return SessionEnd::ConnectFailed(e);
        }

        match self.confirm_identity().await {
            Ok(chain_id) => tracing::info!(
                chain_id = %chain_id,
                generation = self.generation,
                "Connected to network, subscribed to Mint events"
            ),
            Err(e) => return SessionEnd::IdentityFailed(e),
        }
        self.set_state(WatcherState::Subscribed);

        self.pump().await
    }

    /// Attach a new handle. Rejected while another handle is attached.
    fn attach(&mut self, handle: ConnectionHandle<T::Session>) -> Result<(), WatchError> {
        if let Some(current) = &self.handle {
            return Err(WatchError::AlreadyAttached {
                generation: current.generation(),
            });
        }
        self.handle = Some(handle);
        Ok(())
    }

    async fn detach(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.detach().await;
        }
    }

    async fn confirm_identity(&mut self) -> Result<ChainId, WatchError> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(BlockchainError::Transport("no live connection".to_string()).into());
        };

        let chain_id = handle.session_mut().chain_id().await?;
        if let Some(expected) = self.target.expected_chain_id {
            let actual = u64::from(chain_id);
            if actual != expected {
                return Err(BlockchainError::ChainMismatch { expected, actual }.into());
            }
        }
        Ok(chain_id)
    }

    async fn pump(&mut self) -> SessionEnd {
        loop {
            let Some(handle) = self.handle.as_mut() else {
                return SessionEnd::Closed;
            };

            let event = tokio::select! {
                event = handle.session_mut().next_event() => event,
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    log_joined(joined);
                    continue;
                }
            };

            match event {
                SessionEvent::Mint(mint) => self.dispatch(mint).await,
                SessionEvent::Error(e) => return SessionEnd::Errored(e.into()),
                SessionEvent::Closed => return SessionEnd::Closed,
            }
        }
    }

    /// Log the event and hand it to a notification task.
    async fn dispatch(&mut self, event: MintEvent) {
        tracing::info!(
            minter = %event.minter,
            amount = %event.amount,
            tx_hash = event.tx_hash.as_deref().unwrap_or("unknown"),
            block = ?event.block_number,
            "Mint detected"
        );
        metrics::record_mint_event();

        while self.in_flight.len() >= MAX_IN_FLIGHT {
            tracing::warn!(in_flight = self.in_flight.len(), "Notification backlog full, waiting");
            match self.in_flight.join_next().await {
                Some(joined) => log_joined(joined),
                None => break,
            }
        }

        self.in_flight.spawn(deliver(Arc::clone(&self.notifier), event));
    }

    async fn drain_notifications(&mut self) {
        if self.in_flight.is_empty() {
            return;
        }

        let pending = self.in_flight.len();
        if timeout(DRAIN_TIMEOUT, join_all(&mut self.in_flight)).await.is_err() {
            tracing::warn!(
                pending,
                "Notifications still running at shutdown, aborting them"
            );
            self.in_flight.abort_all();
        }
    }

    fn set_state(&self, state: WatcherState) {
        self.state.send_replace(state);
        metrics::record_watcher_state(state.as_metric());
    }
}

async fn deliver<N: Notifier>(notifier: Arc<N>, event: MintEvent) {
    let outcome = notifier.notify(&event).await;
    metrics::record_notification(outcome.is_delivered());

    if let NotifyOutcome::Failed(reason) = outcome {
        tracing::warn!(
            reason = %reason,
            tx_hash = event.tx_hash.as_deref().unwrap_or("unknown"),
            "Mint notification not delivered"
        );
    }
}

async fn join_all(set: &mut JoinSet<()>) {
    while let Some(joined) = set.join_next().await {
        log_joined(joined);
    }
}

fn log_joined(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            tracing::error!(error = %e, "Notification task panicked");
        }
    }
}
