//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mint_bot_events_total` (counter): decoded Mint events
//! - `mint_bot_notifications_total` (counter): notification attempts by outcome
//! - `mint_bot_reconnects_total` (counter): scheduled reconnects by reason
//! - `mint_bot_watcher_state` (gauge): 0=disconnected, 1=connecting, 2=subscribed
//!
//! Recording is a no-op until a recorder is installed, so tests and the CLI
//! never need an exporter.

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder with an HTTP scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_mint_event() {
    counter!("mint_bot_events_total").increment(1);
}

pub fn record_notification(delivered: bool) {
    let outcome = if delivered { "delivered" } else { "failed" };
    counter!("mint_bot_notifications_total", "outcome" => outcome).increment(1);
}

pub fn record_reconnect(reason: &'static str) {
    counter!("mint_bot_reconnects_total", "reason" => reason).increment(1);
}

pub fn record_watcher_state(value: f64) {
    gauge!("mint_bot_watcher_state").set(value);
}
