//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::schema::BotConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_RPC_URL: &str = "RPC_URL";
/// Legacy name still honored when `RPC_URL` is unset.
pub const ENV_RPC_URL_ALIAS: &str = "SEPOLIA_RPC_URL";
pub const ENV_CONTRACT_ADDRESS: &str = "CONTRACT_ADDRESS";
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const ENV_ANIMATION_URL: &str = "TELEGRAM_ANIMATION_URL";
pub const ENV_EXPECTED_CHAIN_ID: &str = "EXPECTED_CHAIN_ID";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file plus the process environment.
pub fn load_config(path: Option<&Path>) -> Result<BotConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Load configuration using `lookup` in place of the process environment.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<BotConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => BotConfig::default(),
    };

    apply_env_overrides(&mut config, &lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment values on top of file values.
///
/// Empty variables are treated as unset, except for the animation URL where
/// an empty value explicitly disables the attachment.
fn apply_env_overrides<F>(config: &mut BotConfig, lookup: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = non_empty(ENV_RPC_URL).or_else(|| non_empty(ENV_RPC_URL_ALIAS)) {
        config.chain.rpc_url = url;
    }
    if let Some(address) = non_empty(ENV_CONTRACT_ADDRESS) {
        config.chain.contract_address = address;
    }
    if let Some(token) = non_empty(ENV_BOT_TOKEN) {
        config.telegram.bot_token = token;
    }
    if let Some(chat_id) = non_empty(ENV_CHAT_ID) {
        config.telegram.chat_id = chat_id;
    }
    if let Some(animation) = lookup(ENV_ANIMATION_URL) {
        let animation = animation.trim();
        config.telegram.animation_url = (!animation.is_empty()).then(|| animation.to_string());
    }
    if let Some(raw) = non_empty(ENV_EXPECTED_CHAIN_ID) {
        let chain_id = raw.trim().parse::<u64>().map_err(|e| {
            ConfigError::Validation(vec![ValidationError::Invalid {
                field: "chain.expected_chain_id",
                reason: format!("{} is not a chain id: {}", ENV_EXPECTED_CHAIN_ID, e),
            }])
        })?;
        config.chain.expected_chain_id = Some(chain_id);
    }

    Ok(())
}
