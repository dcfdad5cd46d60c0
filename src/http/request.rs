//! Request inspection helpers.
//!
//! # Responsibilities
//! - Read the request ID assigned by the request-id layer
//! - Recover the raw request target (path plus query)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing (outermost layer)
//! - The target keeps its query string; matching strips it explicitly

use axum::http::{HeaderMap, Uri};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID of an inbound request, or `unknown` when absent.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Raw request target as sent by the client (`/path?query`).
pub fn request_target(uri: &Uri) -> &str {
    uri.path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_request_target_keeps_query() {
        let uri: Uri = "/proxy/users?page=2".parse().unwrap();
        assert_eq!(request_target(&uri), "/proxy/users?page=2");

        let absolute: Uri = "http://localhost:3000/proxy/a?b=c".parse().unwrap();
        assert_eq!(request_target(&absolute), "/proxy/a?b=c");
    }

    #[test]
    fn test_request_id() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), "unknown");
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc-123"));
        assert_eq!(request_id(&headers), "abc-123");
    }
}
