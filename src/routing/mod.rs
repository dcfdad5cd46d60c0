//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registry Build (at startup):
//!     Entry[] (ingestion order)
//!     → registry.rs (key METHOD:/proxy{path}, last write wins)
//!     → Freeze as immutable EndpointRegistry
//!
//! Incoming Request (method, target):
//!     → matcher.rs (strip query, namespace gate)
//!     → registry.rs (exact lookup)
//!     → Return: RouteDecision
//! ```
//!
//! # Design Decisions
//! - Registry built at startup, immutable at runtime
//! - Exact string matching only
//! - Deterministic: duplicate recordings resolve to the last one

pub mod matcher;
pub mod registry;

pub use matcher::{resolve, strip_query_params, RouteDecision};
pub use registry::{EndpointRegistry, PROXY_PREFIX};
