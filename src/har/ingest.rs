//! HAR document → [`Entry`] transformation.
//!
//! # Responsibilities
//! - Check the document shape (`log.entries` array)
//! - Convert each raw entry independently
//! - Collect per-entry failures instead of aborting the batch
//!
//! # Design Decisions
//! - A bad entry is reported as `Error parsing entry {index}: {message}` and skipped
//! - Path extraction never fails: URL parser, then prefix pattern, then `/`
//! - Base64 bodies are decoded here, padded or not; invalid UTF-8 is replaced, invalid base64 is an error
//! - 1xx statuses are rejected: they cannot be sent as a final response

use std::sync::LazyLock;

use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::entry::{derive_content_type, Entry, NameValue};
use crate::har::spec::HarEntry;

/// Error reported when the document has no `log.entries` array.
pub const INVALID_STRUCTURE: &str = "Invalid HAR format: expected an object with a log.entries array";

// scheme://authority followed by the path, stopping at the query or fragment.
static URL_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^/?#]*(/[^?#]*)").expect("url path pattern is valid")
});

// Standard alphabet, accepting bodies with or without trailing padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Failure converting a single HAR entry.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed entry: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("status {0} is outside 100..=599")]
    InvalidStatus(i64),

    #[error("status {0} cannot be replayed as a final response")]
    InformationalStatus(u16),

    #[error("invalid base64 response body: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Outcome of ingesting one HAR document.
#[derive(Debug, Default)]
pub struct IngestResult {
    /// Successfully converted entries, in document order.
    pub entries: Vec<Entry>,
    /// Human-readable description of every problem encountered.
    pub errors: Vec<String>,
}

impl IngestResult {
    /// A result carrying a single top-level error and no entries.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            errors: vec![error.into()],
        }
    }

    /// Whether the caller should give up: something went wrong and nothing was loaded.
    pub fn should_abort(&self) -> bool {
        !self.errors.is_empty() && self.entries.is_empty()
    }
}

/// Ingest HAR document text.
pub fn ingest_str(text: &str) -> IngestResult {
    match serde_json::from_str::<Value>(text) {
        Ok(doc) => ingest_document(&doc),
        Err(e) => IngestResult::failed(format!("Failed to parse HAR JSON: {e}")),
    }
}

/// Ingest an already parsed HAR document.
pub fn ingest_document(doc: &Value) -> IngestResult {
    let Some(raw_entries) = doc
        .get("log")
        .filter(|log| log.is_object())
        .and_then(|log| log.get("entries"))
        .and_then(Value::as_array)
    else {
        return IngestResult::failed(INVALID_STRUCTURE);
    };

    let mut result = IngestResult::default();
    for (index, raw) in raw_entries.iter().enumerate() {
        match transform_value(raw) {
            Ok(entry) => result.entries.push(entry),
            Err(e) => result.errors.push(format!("Error parsing entry {index}: {e}")),
        }
    }

    tracing::debug!(
        entries = result.entries.len(),
        errors = result.errors.len(),
        "HAR document ingested"
    );
    result
}

fn transform_value(raw: &Value) -> Result<Entry, IngestError> {
    let har_entry = HarEntry::deserialize(raw)?;
    transform(&har_entry)
}

/// Convert one HAR log entry into an [`Entry`].
pub fn transform(raw: &HarEntry) -> Result<Entry, IngestError> {
    let status = u16::try_from(raw.response.status)
        .ok()
        .filter(|s| (100..=599).contains(s))
        .ok_or(IngestError::InvalidStatus(raw.response.status))?;
    if status < 200 {
        return Err(IngestError::InformationalStatus(status));
    }

    let response_headers: Vec<NameValue> = raw.response.headers.iter().map(NameValue::from).collect();
    let content_type = derive_content_type(&response_headers);

    Ok(Entry {
        method: raw.request.method.to_uppercase(),
        url: raw.request.url.clone(),
        path: extract_path(&raw.request.url),
        query_string: raw.request.query_string.iter().map(NameValue::from).collect(),
        request_headers: raw.request.headers.iter().map(NameValue::from).collect(),
        status,
        response_headers,
        response_body: decode_body(
            raw.response.content.text.as_deref(),
            raw.response.content.encoding.as_deref(),
        )?,
        content_type,
        timestamp: raw.started_date_time.clone(),
    })
}

/// Path component of a recorded URL.
pub fn extract_path(raw_url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(raw_url) {
        return parsed.path().to_string();
    }
    URL_PATH
        .captures(raw_url)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| "/".to_string())
}

/// Decode a recorded response body into text.
pub fn decode_body(text: Option<&str>, encoding: Option<&str>) -> Result<String, IngestError> {
    let Some(text) = text else {
        return Ok(String::new());
    };
    if encoding == Some("base64") {
        let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = LENIENT_BASE64.decode(compact)?;
        return Ok(String::from_utf8_lossy(&bytes).into_owned());
    }
    Ok(text.to_string())
}
