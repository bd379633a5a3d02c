//! Configuration validation.
//!
//! # Responsibilities
//! - Presence checks for every required connection and credential parameter
//! - Format checks (contract address, metrics address)
//! - Value ranges (timeouts > 0, retry interval > 0, decimals representable)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BotConfig → Result<(), Vec<ValidationError>>
//! - Runs before any network connection is attempted

use alloy::primitives::Address;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::loader::{
    ENV_BOT_TOKEN, ENV_CHAT_ID, ENV_CONTRACT_ADDRESS, ENV_RPC_URL,
};
use crate::config::schema::{BackoffKind, BotConfig};

/// Largest decimal count whose scale factor still fits in a U256.
pub const MAX_DECIMALS: u8 = 77;

/// A single semantic problem with the loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required parameter is absent or empty.
    #[error("missing required parameter {env} ({field})")]
    Missing {
        field: &'static str,
        env: &'static str,
    },

    /// A parameter is present but malformed or out of range.
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &BotConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    require(&mut errors, &config.chain.rpc_url, "chain.rpc_url", ENV_RPC_URL);
    require(&mut errors, &config.telegram.bot_token, "telegram.bot_token", ENV_BOT_TOKEN);
    require(&mut errors, &config.telegram.chat_id, "telegram.chat_id", ENV_CHAT_ID);

    if config.chain.contract_address.trim().is_empty() {
        errors.push(ValidationError::Missing {
            field: "chain.contract_address",
            env: ENV_CONTRACT_ADDRESS,
        });
    } else if let Err(e) = config.chain.contract_address.trim().parse::<Address>() {
        errors.push(ValidationError::Invalid {
            field: "chain.contract_address",
            reason: e.to_string(),
        });
    }

    if config.chain.rpc_timeout_secs == 0 {
        errors.push(invalid("chain.rpc_timeout_secs", "must be greater than 0"));
    }
    if config.telegram.timeout_secs == 0 {
        errors.push(invalid("telegram.timeout_secs", "must be greater than 0"));
    }
    if config.token.decimals > MAX_DECIMALS {
        errors.push(invalid(
            "token.decimals",
            format!("must be at most {}", MAX_DECIMALS),
        ));
    }

    let retry = &config.retry;
    if retry.interval_ms == 0 {
        errors.push(invalid("retry.interval_ms", "must be greater than 0"));
    }
    if retry.max_attempts == Some(0) {
        errors.push(invalid("retry.max_attempts", "must be at least 1 when set"));
    }
    if retry.backoff == BackoffKind::Exponential && retry.max_delay_ms < retry.interval_ms {
        errors.push(invalid(
            "retry.max_delay_ms",
            "must not be smaller than retry.interval_ms",
        ));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(invalid(
            "observability.metrics_address",
            format!("'{}' is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn require(
    errors: &mut Vec<ValidationError>,
    value: &str,
    field: &'static str,
    env: &'static str,
) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Missing { field, env });
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ValidationError {
    ValidationError::Invalid {
        field,
        reason: reason.into(),
    }
}
