//! Request matching and replay decision.
//!
//! # Responsibilities
//! - Strip the query string from the request target
//! - Gate requests on the `/proxy` namespace
//! - Decide how an inbound request is answered
//!
//! # Design Decisions
//! - Pure function of (registry, method, target, cors flag); no I/O
//! - Matching is case-sensitive on the path, case-insensitive on the method
//! - A miss is a value, not an error

use std::sync::Arc;

use crate::entry::Entry;
use crate::routing::registry::{EndpointRegistry, PROXY_PREFIX};

/// How the server should answer a request.
#[derive(Debug, Clone)]
pub enum RouteDecision {
    /// `GET /`: render the endpoint dashboard.
    Dashboard,
    /// CORS preflight inside the proxy namespace.
    CorsPreflight,
    /// Path is not under `/proxy`.
    OutsideNamespace { path: String },
    /// Path is under `/proxy` but nothing was recorded for it.
    Miss { method: String, path: String },
    /// Replay this recording.
    Hit(Arc<Entry>),
}

/// Truncate a request target at the first `?`.
pub fn strip_query_params(target: &str) -> &str {
    match target.find('?') {
        Some(idx) => &target[..idx],
        None => target,
    }
}

/// Whether a query-free path lies in the proxy namespace.
pub fn is_proxy_path(path: &str) -> bool {
    path.strip_prefix(PROXY_PREFIX)
        .map(|rest| rest.is_empty() || rest.starts_with('/'))
        .unwrap_or(false)
}

/// Decide how to answer `method target`.
pub fn resolve(
    registry: &EndpointRegistry,
    method: &str,
    target: &str,
    cors_enabled: bool,
) -> RouteDecision {
    let path = strip_query_params(target);
    let method = method.to_uppercase();

    if path == "/" && method == "GET" {
        return RouteDecision::Dashboard;
    }

    let in_namespace = is_proxy_path(path);

    if cors_enabled && method == "OPTIONS" && in_namespace {
        return RouteDecision::CorsPreflight;
    }

    if !in_namespace {
        return RouteDecision::OutsideNamespace {
            path: path.to_string(),
        };
    }

    match registry.find_matching_entry(&method, path) {
        Some(entry) => RouteDecision::Hit(entry),
        None => RouteDecision::Miss {
            method,
            path: path.to_string(),
        },
    }
}
