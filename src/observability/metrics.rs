//! Metrics collection and exposition.
//!
//! # Metrics
//! - `har_replay_requests_total` (counter): requests by method, status, outcome
//! - `har_replay_request_duration_seconds` (histogram): handling latency
//! - `har_replay_endpoints` (gauge): distinct endpoints in the registry
//!
//! # Design Decisions
//! - Uses the `metrics` facade; without an installed recorder every call is a no-op
//! - Prometheus exporter is opt-in via configuration
//! - Method labels are limited to the standard verbs; anything else is `OTHER`

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

const KNOWN_METHODS: [&str; 9] = [
    "GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS", "TRACE", "PATCH",
];

/// Bounded label value for a client-supplied method token.
fn method_label(method: &str) -> &'static str {
    KNOWN_METHODS
        .iter()
        .find(|known| method.eq_ignore_ascii_case(known))
        .copied()
        .unwrap_or("OTHER")
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "har_replay_requests_total",
        "method" => method_label(method),
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("har_replay_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Publish the registry size.
pub fn record_endpoints(count: usize) {
    metrics::gauge!("har_replay_endpoints").set(count as f64);
}
