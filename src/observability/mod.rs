//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     → logging.rs (subscriber from ObservabilityConfig)
//!     → metrics.rs (optional Prometheus exporter, endpoint gauge)
//!
//! Per request (http/server.rs):
//!     → logging::log_request (method, path, status)
//!     → metrics::record_request (counter + latency)
//! ```
//!
//! # Design Decisions
//! - Observers never influence routing
//! - Request ID flows through every log line via the trace layer

pub mod logging;
pub mod metrics;
