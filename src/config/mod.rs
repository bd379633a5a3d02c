//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file (tunables)
//!     → loader.rs (parse & deserialize)
//!     → environment overlay (.env / process env: endpoint, contract, credentials)
//!     → validation.rs (presence & semantic checks)
//!     → BotConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is loaded once at startup; there is no reload
//! - All fields have defaults so the TOML file is optional
//! - A missing required parameter is fatal before any network I/O

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::BotConfig;
pub use schema::ChainConfig;
pub use schema::ObservabilityConfig;
pub use schema::RetryConfig;
pub use schema::TelegramConfig;
pub use schema::TokenConfig;
