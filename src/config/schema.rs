//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bot.
//! All types derive Serde traits so tunables can be read from a TOML file;
//! credentials and connection parameters normally arrive through the
//! environment (see `loader.rs`).

use serde::{Deserialize, Serialize};

/// Root configuration for the mint notifier.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BotConfig {
    /// Node connection and watched contract.
    pub chain: ChainConfig,

    /// Token metadata used when formatting amounts.
    pub token: TokenConfig,

    /// Telegram delivery settings.
    pub telegram: TelegramConfig,

    /// Reconnect schedule for the event subscription.
    pub retry: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Node connection and contract binding.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// WebSocket RPC endpoint (e.g., "wss://sepolia.example/ws").
    pub rpc_url: String,

    /// Address of the contract emitting `Mint`.
    pub contract_address: String,

    /// Chain ID the node must report. Unchecked when absent.
    pub expected_chain_id: Option<u64>,

    /// Timeout for connect and identity RPC calls in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: String::new(),
            contract_address: String::new(),
            expected_chain_id: None,
            rpc_timeout_secs: 10,
        }
    }
}

/// Token metadata.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Decimal places of the base unit.
    pub decimals: u8,

    /// Ticker shown in the caption label.
    pub symbol: String,

    /// Long name shown next to the amount.
    pub name: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            decimals: 18,
            symbol: "dETH".to_string(),
            name: "Dethereum".to_string(),
        }
    }
}

/// Telegram Bot API settings.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot credential issued by BotFather.
    pub bot_token: String,

    /// Destination chat or channel identifier.
    pub chat_id: String,

    /// Optional animation attached to every notification.
    pub animation_url: Option<String>,

    /// Bot API base URL.
    pub api_base: String,

    /// Explorer prefix for transaction deep links.
    pub explorer_tx_base: String,

    /// Telegram text formatting mode.
    pub parse_mode: String,

    /// Request timeout for the outbound call in seconds.
    pub timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            animation_url: None,
            api_base: "https://api.telegram.org".to_string(),
            explorer_tx_base: "https://sepolia.etherscan.io/tx/".to_string(),
            parse_mode: "Markdown".to_string(),
            timeout_secs: 10,
        }
    }
}

// Keeps the bot token out of debug logs.
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("animation_url", &self.animation_url)
            .field("api_base", &self.api_base)
            .field("explorer_tx_base", &self.explorer_tx_base)
            .field("parse_mode", &self.parse_mode)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Backoff shape for reconnect delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    /// Same delay for every attempt.
    Fixed,
    /// Doubling delay capped at `max_delay_ms`.
    Exponential,
}

/// Reconnect configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Base delay between reconnect attempts in milliseconds.
    pub interval_ms: u64,

    /// Maximum consecutive failed attempts. Unbounded when absent.
    pub max_attempts: Option<u32>,

    /// Delay growth between attempts.
    pub backoff: BackoffKind,

    /// Cap for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Add up to 10% random jitter to each delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5_000,
            max_attempts: None,
            backoff: BackoffKind::Fixed,
            max_delay_ms: 60_000,
            jitter: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Output format of the log subscriber.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
