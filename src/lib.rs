//! Contract Mint event notifier library.

pub mod blockchain;
pub mod config;
pub mod lifecycle;
pub mod notify;
pub mod observability;
pub mod resilience;
pub mod watcher;

pub use config::schema::BotConfig;
pub use lifecycle::Shutdown;
pub use watcher::ChainWatcher;
