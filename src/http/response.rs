//! Response construction for each replay decision.
//!
//! # Responsibilities
//! - Rebuild a recorded response (status, headers, body)
//! - Add CORS headers when enabled
//! - Map misses and namespace violations to structured JSON 404s
//!
//! # Design Decisions
//! - `content-encoding`, `transfer-encoding` and `content-length` are never replayed;
//!   the body is held decoded in memory and its length is computed by the server
//! - Repeated recorded headers are replayed as repeated headers
//! - Recorded headers that are not valid HTTP (e.g. `:status`) are skipped

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::entry::Entry;

/// Recorded headers that are dropped on replay.
pub const EXCLUDED_HEADERS: [&str; 3] = ["content-encoding", "transfer-encoding", "content-length"];

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization, X-Requested-With";

/// JSON body of every 404 produced by the server.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

fn is_excluded(name: &str) -> bool {
    EXCLUDED_HEADERS
        .iter()
        .any(|excluded| name.eq_ignore_ascii_case(excluded))
}

/// Insert (or overwrite) the three CORS headers.
pub fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(CORS_ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
}

/// Replay a recorded response.
pub fn replay(entry: &Entry, cors_enabled: bool) -> Response {
    let Some(status) = StatusCode::from_u16(entry.status)
        .ok()
        .filter(|s| !s.is_informational())
    else {
        tracing::error!(status = entry.status, "Recorded status cannot be replayed as a final response");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Invalid recorded status").into_response();
    };

    let mut headers = HeaderMap::new();
    for recorded in &entry.response_headers {
        if is_excluded(&recorded.name) {
            continue;
        }
        match (
            HeaderName::from_bytes(recorded.name.as_bytes()),
            HeaderValue::from_bytes(recorded.value.as_bytes()),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => tracing::debug!(header = %recorded.name, "Skipping recorded header that is not valid HTTP"),
        }
    }

    if !headers.contains_key(header::CONTENT_TYPE) {
        if let Ok(value) = HeaderValue::from_str(&entry.content_type) {
            headers.insert(header::CONTENT_TYPE, value);
        }
    }

    if cors_enabled {
        apply_cors_headers(&mut headers);
    }

    let mut response = Response::new(Body::from(entry.response_body.clone()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Empty 204 answer to a CORS preflight.
pub fn cors_preflight() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    apply_cors_headers(response.headers_mut());
    response
}

/// 404 for a path outside the proxy namespace.
pub fn outside_namespace(path: &str) -> Response {
    not_found(format!(
        "Path {path} is not a proxy endpoint. HAR endpoints are available under /proxy/*"
    ))
}

/// 404 for a proxy path with no recording.
pub fn no_recording(method: &str, path: &str) -> Response {
    not_found(format!("No HAR entry found for {method} {path}"))
}

fn not_found(message: String) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Not Found",
            message,
        }),
    )
        .into_response()
}
