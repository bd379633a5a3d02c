//! Telegram Bot API notifier.
//!
//! # Responsibilities
//! - Build the `sendMessage` / `sendAnimation` payload for a Mint event
//! - POST it with a request timeout
//! - Interpret the `{ "ok": ..., "description": ... }` envelope
//!
//! # Security
//! - The bot token is part of the request URL; it is never logged and
//!   transport errors are stripped of their URL before being reported

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::blockchain::types::MintEvent;
use crate::config::TelegramConfig;
use crate::notify::format::MessageTemplate;
use crate::notify::{Notifier, NotifyOutcome};

/// Errors from one delivery attempt.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Connection or protocol failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The request exceeded the configured timeout.
    #[error("Telegram request timed out")]
    Timeout,

    /// Non-success HTTP status.
    #[error("Telegram returned status {status}: {description}")]
    Status { status: u16, description: String },

    /// HTTP success but `ok: false` or an unreadable body.
    #[error("Telegram rejected the message: {0}")]
    Rejected(String),
}

/// Outbound request body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TelegramPayload {
    pub chat_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub parse_mode: String,
    pub disable_web_page_preview: bool,
}

impl TelegramPayload {
    /// Bot API method for this payload.
    pub fn method(&self) -> &'static str {
        if self.animation.is_some() {
            "sendAnimation"
        } else {
            "sendMessage"
        }
    }

    /// Caption or message text, whichever is set.
    pub fn body(&self) -> &str {
        self.caption
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends Mint notifications to one Telegram chat.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
    animation_url: Option<String>,
    parse_mode: String,
    template: MessageTemplate,
}

impl TelegramNotifier {
    /// Create a notifier from validated configuration.
    pub fn new(config: &TelegramConfig, template: MessageTemplate) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NotifyError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
            animation_url: config.animation_url.clone().filter(|url| !url.is_empty()),
            parse_mode: config.parse_mode.clone(),
            template,
        })
    }

    /// Build the request body for an event.
    pub fn payload(&self, event: &MintEvent) -> TelegramPayload {
        let caption = self.template.caption(event);
        let (text, animation, caption) = match &self.animation_url {
            Some(url) => (None, Some(url.clone()), Some(caption)),
            None => (Some(caption), None, None),
        };

        TelegramPayload {
            chat_id: self.chat_id.clone(),
            text,
            animation,
            caption,
            parse_mode: self.parse_mode.clone(),
            disable_web_page_preview: true,
        }
    }

    /// POST one payload.
    pub async fn send(&self, payload: &TelegramPayload) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/{}", self.api_base, self.bot_token, payload.method());

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.text().await.map_err(classify)?;
        let parsed = serde_json::from_str::<TelegramResponse>(&body).ok();

        if !status.is_success() {
            let description = parsed
                .and_then(|r| r.description)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(NotifyError::Status {
                status: status.as_u16(),
                description,
            });
        }

        match parsed {
            Some(TelegramResponse { ok: true, .. }) => Ok(()),
            Some(TelegramResponse { description, .. }) => Err(NotifyError::Rejected(
                description.unwrap_or_else(|| "no description".to_string()),
            )),
            None => Err(NotifyError::Rejected("unreadable response body".to_string())),
        }
    }
}

fn classify(e: reqwest::Error) -> NotifyError {
    if e.is_timeout() {
        NotifyError::Timeout
    } else {
        NotifyError::Http(e.without_url().to_string())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, event: &MintEvent) -> NotifyOutcome {
        let payload = self.payload(event);

        match self.send(&payload).await {
            Ok(()) => {
                tracing::info!(method = payload.method(), "Telegram message sent successfully");
                NotifyOutcome::Delivered
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    method = payload.method(),
                    "Error sending Telegram message. Check TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID"
                );
                NotifyOutcome::Failed(e.to_string())
            }
        }
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("api_base", &self.api_base)
            .field("chat_id", &self.chat_id)
            .field("animation", &self.animation_url.is_some())
            .finish()
    }
}
