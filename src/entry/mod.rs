//! Canonical in-memory model of one recorded exchange.
//!
//! # Data Flow
//! ```text
//! HAR log entry
//!     → har::ingest (validate, decode body)
//!     → Entry (immutable)
//!     → routing::registry (keyed by method + proxied path)
//!     → codec.rs (human-readable export / debug view)
//! ```
//!
//! # Design Decisions
//! - Bodies are always held decoded; base64 never survives ingestion
//! - Header and query pairs keep their recorded order
//! - Entries are never mutated after construction; the registry shares them via Arc

pub mod codec;

pub use codec::{format_entries, format_entry, parse_entry, FormatError};

/// Content type used when a recording carries no `content-type` header.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// An ordered (name, value) pair, used for headers and query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

impl NameValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One recorded request/response pair, ready for replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Upper-cased HTTP method token.
    pub method: String,
    /// Original absolute URL, kept for diagnostics only.
    pub url: String,
    /// Path component of the URL; the routing key.
    pub path: String,
    /// Request query parameters. Not used for matching.
    pub query_string: Vec<NameValue>,
    /// Request headers. Never replayed.
    pub request_headers: Vec<NameValue>,
    pub status: u16,
    pub response_headers: Vec<NameValue>,
    pub response_body: String,
    pub content_type: String,
    /// Capture time as recorded (ISO-8601), carried through untouched.
    pub timestamp: String,
}

/// Case-insensitive header lookup over an ordered header list.
pub fn find_header<'a>(headers: &'a [NameValue], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

/// Derive the content type of a response from its headers.
pub fn derive_content_type(headers: &[NameValue]) -> String {
    find_header(headers, "content-type")
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}
