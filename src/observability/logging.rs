//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Emit one structured event per handled request
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for machine consumption, pretty format for development
//! - `RUST_LOG` overrides the configured level

use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install the global tracing subscriber.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "har_replay={level},tower_http={level}",
            level = config.log_level.to_lowercase()
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }
}

/// Record a handled request. Purely observational.
pub fn log_request(method: &str, path: &str, status: u16, elapsed: Duration) {
    tracing::info!(
        method = %method,
        path = %path,
        status = status,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "Request served"
    );
}
