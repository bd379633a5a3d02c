//! Shared utilities for integration testing.

#![allow(dead_code)]

use alloy::primitives::{Address, TxHash, B256, U256};
use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use mint_notifier::blockchain::events::abi;
use mint_notifier::blockchain::{BlockchainError, BlockchainResult, ChainId, MintEvent};
use mint_notifier::notify::{Notifier, NotifyOutcome};
use mint_notifier::watcher::{MintSession, MintTransport, SessionEvent, WatchTarget};

pub const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// A Mint of 2.5 tokens (18 decimals) to 0xABCD...0001.
pub fn sample_mint(tx_hash: &str) -> MintEvent {
    MintEvent {
        minter: "0xABCD000000000000000000000000000000000001"
            .parse::<Address>()
            .unwrap(),
        amount: U256::from(2_500_000_000_000_000_000u128),
        deposit: None,
        tx_hash: Some(tx_hash.to_string()),
        block_number: Some(1),
    }
}

pub fn target() -> WatchTarget {
    WatchTarget {
        endpoint: "ws://node.test".to_string(),
        contract: CONTRACT.parse().unwrap(),
        expected_chain_id: None,
    }
}

// ---------------------------------------------------------------------------
// Scripted transport
// ---------------------------------------------------------------------------

/// One step a scripted session yields.
#[derive(Debug, Clone)]
pub enum Step {
    Mint(MintEvent),
    Error,
    Close,
}

/// Behaviour of one connection cycle.
#[derive(Debug, Clone)]
pub struct SessionScript {
    pub open_fails: bool,
    pub chain_id: u64,
    pub steps: Vec<Step>,
}

impl SessionScript {
    /// Opens, then the stream closes.
    pub fn closes() -> Self {
        Self::with_steps(vec![Step::Close])
    }

    /// Opens, then the stream reports a transport error.
    pub fn errors() -> Self {
        Self::with_steps(vec![Step::Error])
    }

    /// Opens, yields the events, then stays idle.
    pub fn mints(events: Vec<MintEvent>) -> Self {
        Self::with_steps(events.into_iter().map(Step::Mint).collect())
    }

    /// The connection cannot be constructed.
    pub fn unreachable() -> Self {
        Self {
            open_fails: true,
            chain_id: 1,
            steps: Vec::new(),
        }
    }

    pub fn with_steps(steps: Vec<Step>) -> Self {
        Self {
            open_fails: false,
            chain_id: 1,
            steps,
        }
    }

    pub fn on_chain(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }
}

/// Counters shared between a test and its transport.
#[derive(Clone, Default)]
pub struct TransportStats {
    pub opens: Arc<AtomicUsize>,
    pub live: Arc<AtomicUsize>,
    pub max_live: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
}

impl TransportStats {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn max_live(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Plays one `SessionScript` per `open` call; fails once the scripts run out.
pub struct ScriptedTransport {
    scripts: Mutex<VecDeque<SessionScript>>,
    stats: TransportStats,
}

impl ScriptedTransport {
    pub fn new(scripts: Vec<SessionScript>) -> (Self, TransportStats) {
        let stats = TransportStats::default();
        let transport = Self {
            scripts: Mutex::new(scripts.into()),
            stats: stats.clone(),
        };
        (transport, stats)
    }
}

#[async_trait]
impl MintTransport for ScriptedTransport {
    type Session = ScriptedSession;

    async fn open(&self, _target: &WatchTarget) -> BlockchainResult<ScriptedSession> {
        self.stats.opens.fetch_add(1, Ordering::SeqCst);

        let script = self.scripts.lock().unwrap().pop_front();
        let script = match script {
            Some(script) if !script.open_fails => script,
            _ => return Err(BlockchainError::Connect("connection refused".to_string())),
        };

        let live = self.stats.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_live.fetch_max(live, Ordering::SeqCst);

        Ok(ScriptedSession {
            steps: script.steps.into(),
            chain_id: script.chain_id,
            stats: self.stats.clone(),
            open: true,
        })
    }
}

pub struct ScriptedSession {
    steps: VecDeque<Step>,
    chain_id: u64,
    stats: TransportStats,
    open: bool,
}

impl ScriptedSession {
    fn release(&mut self) {
        if self.open {
            self.open = false;
            self.stats.live.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl MintSession for ScriptedSession {
    async fn chain_id(&mut self) -> BlockchainResult<ChainId> {
        Ok(ChainId(self.chain_id))
    }

    async fn next_event(&mut self) -> SessionEvent {
        match self.steps.pop_front() {
            Some(Step::Mint(event)) => SessionEvent::Mint(event),
            Some(Step::Error) => {
                SessionEvent::Error(BlockchainError::Transport("connection reset".to_string()))
            }
            Some(Step::Close) => SessionEvent::Closed,
            None => std::future::pending().await,
        }
    }

    async fn close(&mut self) {
        if self.open {
            self.stats.closed.fetch_add(1, Ordering::SeqCst);
        }
        self.release();
    }
}

impl Drop for ScriptedSession {
    fn drop(&mut self) {
        self.release();
    }
}

// ---------------------------------------------------------------------------
// Recording notifier
// ---------------------------------------------------------------------------

/// Records every event it is asked to deliver.
pub struct RecordingNotifier {
    tx: mpsc::UnboundedSender<MintEvent>,
    calls: AtomicUsize,
    completed: AtomicUsize,
    fail: bool,
    delay: Option<Duration>,
}

impl RecordingNotifier {
    pub fn new(fail: bool) -> (Arc<Self>, mpsc::UnboundedReceiver<MintEvent>) {
        Self::build(fail, None)
    }

    /// Records the call at once, then takes `delay` to answer.
    pub fn slow(delay: Duration) -> (Arc<Self>, mpsc::UnboundedReceiver<MintEvent>) {
        Self::build(false, Some(delay))
    }

    fn build(
        fail: bool,
        delay: Option<Duration>,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<MintEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let notifier = Arc::new(Self {
            tx,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            fail,
            delay,
        });
        (notifier, rx)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, event: &MintEvent) -> NotifyOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.tx.send(event.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            NotifyOutcome::Failed("simulated network error".to_string())
        } else {
            NotifyOutcome::Delivered
        }
    }
}

// ---------------------------------------------------------------------------
// Mock Telegram API
// ---------------------------------------------------------------------------

/// A request received by the mock API.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub body: serde_json::Value,
}

/// Start a mock Bot API that answers every request with a fixed response.
pub async fn start_mock_telegram(
    status: u16,
    response: &'static str,
) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedRequest>) {
    start_programmable_telegram(move || async move { (status, response.to_string()) }).await
}

/// Start a programmable mock Bot API with async support.
pub async fn start_programmable_telegram<F, Fut>(
    f: F,
) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedRequest>)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let Some((path, body)) = read_request(&mut socket).await else {
                            return;
                        };
                        let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
                        let _ = tx.send(CapturedRequest { path, body });

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            401 => "401 Unauthorized",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };
                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, rx)
}

/// Start a backend that accepts connections but never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn read_request(socket: &mut TcpStream) -> Option<(String, Vec<u8>)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let path = head.lines().next()?.split_whitespace().nth(1)?.to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some((path, buf[body_start..body_start + content_length].to_vec()))
}

// ---------------------------------------------------------------------------
// Mock WebSocket JSON-RPC node
// ---------------------------------------------------------------------------

pub const SUBSCRIPTION_ID: &str =
    "0x00000000000000000000000000000000000000000000000000000000000000a1";

/// Counters shared between a test and its mock node.
#[derive(Clone, Default)]
pub struct NodeStats {
    pub connections: Arc<AtomicUsize>,
    pub subscribes: Arc<AtomicUsize>,
    pub chain_id_requests: Arc<AtomicUsize>,
}

impl NodeStats {
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    pub fn subscribes(&self) -> usize {
        self.subscribes.load(Ordering::SeqCst)
    }

    pub fn chain_id_requests(&self) -> usize {
        self.chain_id_requests.load(Ordering::SeqCst)
    }
}

/// A Mint log as a node would push it, 18-decimal 2.5 tokens to `to`.
pub fn mint_log_json(to: Address) -> Value {
    let data = abi::plain::Mint {
        to,
        amount: U256::from(2_500_000_000_000_000_000u128),
    }
    .encode_log_data();

    let log = Log {
        inner: alloy::primitives::Log {
            address: CONTRACT.parse().unwrap(),
            data,
        },
        block_hash: Some(B256::repeat_byte(0xbb)),
        block_number: Some(42),
        transaction_hash: Some(TxHash::repeat_byte(0xde)),
        transaction_index: Some(0),
        log_index: Some(0),
        ..Default::default()
    };
    serde_json::to_value(&log).unwrap()
}

/// Start a node answering `eth_subscribe` and `eth_chainId` over WebSocket.
///
/// The first connection gets `log` pushed right after its chain id request,
/// then the socket is dropped without a close frame. For `reject_window`
/// after that, handshakes are refused so the client cannot quietly resume
/// the old subscription. Later connections are served but get no logs.
pub async fn start_mock_node(
    chain_id: u64,
    log: Value,
    reject_window: Duration,
) -> (SocketAddr, NodeStats) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let stats = NodeStats::default();
    let node_stats = stats.clone();

    tokio::spawn(async move {
        let mut dropped_at: Option<Instant> = None;
        let mut pushed = false;

        while let Ok((socket, _)) = listener.accept().await {
            if dropped_at.is_some_and(|at| at.elapsed() < reject_window) {
                drop(socket);
                continue;
            }
            let Ok(ws) = tokio_tungstenite::accept_async(socket).await else {
                continue;
            };
            node_stats.connections.fetch_add(1, Ordering::SeqCst);

            if !pushed {
                pushed = true;
                serve_node(ws, chain_id, Some(log.clone()), node_stats.clone()).await;
                dropped_at = Some(Instant::now());
            } else {
                tokio::spawn(serve_node(ws, chain_id, None, node_stats.clone()));
            }
        }
    });

    (addr, stats)
}

async fn serve_node(
    mut ws: WebSocketStream<TcpStream>,
    chain_id: u64,
    push: Option<Value>,
    stats: NodeStats,
) {
    while let Some(Ok(message)) = ws.next().await {
        let Ok(text) = message.to_text() else {
            continue;
        };
        let Ok(request) = serde_json::from_str::<Value>(text) else {
            continue;
        };

        let method = request["method"].as_str().unwrap_or_default().to_string();
        let result = match method.as_str() {
            "eth_subscribe" => {
                stats.subscribes.fetch_add(1, Ordering::SeqCst);
                json!(SUBSCRIPTION_ID)
            }
            "eth_chainId" => {
                stats.chain_id_requests.fetch_add(1, Ordering::SeqCst);
                json!(format!("0x{:x}", chain_id))
            }
            "eth_unsubscribe" => json!(true),
            _ => Value::Null,
        };

        let response = json!({ "jsonrpc": "2.0", "id": request["id"], "result": result });
        if ws.send(Message::text(response.to_string())).await.is_err() {
            return;
        }

        if method == "eth_chainId" {
            if let Some(log) = &push {
                let notification = json!({
                    "jsonrpc": "2.0",
                    "method": "eth_subscription",
                    "params": { "subscription": SUBSCRIPTION_ID, "result": log },
                });
                let _ = ws.send(Message::text(notification.to_string())).await;
                tokio::time::sleep(Duration::from_millis(100)).await;
                return;
            }
        }
    }
}
