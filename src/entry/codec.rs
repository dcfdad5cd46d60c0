//! Human-readable text rendering of an [`Entry`] and its inverse.
//!
//! Layout:
//! ```text
//! GET /users 200 application/json [2024-01-01T00:00:00.000Z]
//! Request Headers:
//!   accept: application/json
//! Query Parameters:
//!   page=2
//! Response Headers:
//!   content-type: application/json
//! Response Body:
//!   {"users":[]}
//! ```
//!
//! Sections are only written when they have content. Bodies longer than
//! [`BODY_PREVIEW_CHARS`] characters are cut and marked with `...`, so the
//! round trip is exact only for short bodies. Header and query values that
//! contain a newline, or names containing the `": "` / `=` delimiters, do not
//! survive a round trip either. The URL is not encoded; parsed entries get
//! `http://localhost{path}`.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::{Entry, NameValue};

/// Maximum number of body characters written before truncation.
pub const BODY_PREVIEW_CHARS: usize = 200;

/// Appended to a body that was cut at [`BODY_PREVIEW_CHARS`].
pub const TRUNCATION_MARKER: &str = "...";

const REQUEST_HEADERS: &str = "Request Headers:";
const QUERY_PARAMETERS: &str = "Query Parameters:";
const RESPONSE_HEADERS: &str = "Response Headers:";
const RESPONSE_BODY: &str = "Response Body:";
const INDENT: &str = "  ";

// method path status content-type [timestamp]
static SUMMARY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+) (\S+) (\d+) (.*) \[([^\]]*)\]$").expect("summary line pattern is valid")
});

/// Errors produced when text does not look like a formatted entry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid entry summary line: {0:?}")]
    InvalidSummaryLine(String),

    #[error("invalid status code: {0}")]
    InvalidStatus(String),
}

/// Section of the text block currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    RequestHeaders,
    QueryParameters,
    ResponseHeaders,
    Body,
}

impl Section {
    fn from_marker(line: &str) -> Option<Self> {
        match line {
            REQUEST_HEADERS => Some(Section::RequestHeaders),
            QUERY_PARAMETERS => Some(Section::QueryParameters),
            RESPONSE_HEADERS => Some(Section::ResponseHeaders),
            RESPONSE_BODY => Some(Section::Body),
            _ => None,
        }
    }
}

/// Render an entry as a text block.
pub fn format_entry(entry: &Entry) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "{} {} {} {} [{}]",
        entry.method, entry.path, entry.status, entry.content_type, entry.timestamp
    );

    if !entry.request_headers.is_empty() {
        let _ = writeln!(out, "{REQUEST_HEADERS}");
        for h in &entry.request_headers {
            let _ = writeln!(out, "{INDENT}{}: {}", h.name, h.value);
        }
    }

    if !entry.query_string.is_empty() {
        let _ = writeln!(out, "{QUERY_PARAMETERS}");
        for q in &entry.query_string {
            let _ = writeln!(out, "{INDENT}{}={}", q.name, q.value);
        }
    }

    if !entry.response_headers.is_empty() {
        let _ = writeln!(out, "{RESPONSE_HEADERS}");
        for h in &entry.response_headers {
            let _ = writeln!(out, "{INDENT}{}: {}", h.name, h.value);
        }
    }

    if !entry.response_body.is_empty() {
        let _ = writeln!(out, "{RESPONSE_BODY}");
        for line in body_preview(&entry.response_body).split('\n') {
            let _ = writeln!(out, "{INDENT}{line}");
        }
    }

    out
}

/// Render several entries, separated by a blank line.
pub fn format_entries(entries: &[Entry]) -> String {
    entries
        .iter()
        .map(format_entry)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a text block produced by [`format_entry`].
pub fn parse_entry(text: &str) -> Result<Entry, FormatError> {
    let mut lines = text.split('\n');
    let summary = lines.next().unwrap_or_default().trim_end_matches('\r');

    let caps = SUMMARY_LINE
        .captures(summary)
        .ok_or_else(|| FormatError::InvalidSummaryLine(summary.to_string()))?;

    let status = caps[3]
        .parse::<u16>()
        .ok()
        .filter(|s| (100..=599).contains(s))
        .ok_or_else(|| FormatError::InvalidStatus(caps[3].to_string()))?;

    let path = caps[2].to_string();
    let mut entry = Entry {
        method: caps[1].to_string(),
        url: format!("http://localhost{path}"),
        path,
        query_string: Vec::new(),
        request_headers: Vec::new(),
        status,
        response_headers: Vec::new(),
        response_body: String::new(),
        content_type: caps[4].to_string(),
        timestamp: caps[5].to_string(),
    };

    let mut section = Section::None;
    let mut body_lines: Vec<&str> = Vec::new();

    for line in lines {
        if let Some(next) = Section::from_marker(line) {
            section = next;
            continue;
        }
        let Some(content) = line.strip_prefix(INDENT) else {
            continue;
        };
        match section {
            Section::None => {}
            Section::RequestHeaders => entry.request_headers.push(split_header(content)),
            Section::ResponseHeaders => entry.response_headers.push(split_header(content)),
            Section::QueryParameters => entry.query_string.push(split_query(content)),
            Section::Body => body_lines.push(content),
        }
    }

    entry.response_body = body_lines.join("\n");
    Ok(entry)
}

fn body_preview(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &body[..cut]),
        None => body.to_string(),
    }
}

fn split_header(line: &str) -> NameValue {
    match line.split_once(": ") {
        Some((name, value)) => NameValue::new(name, value),
        None => NameValue::new(line, ""),
    }
}

fn split_query(line: &str) -> NameValue {
    match line.split_once('=') {
        Some((name, value)) => NameValue::new(name, value),
        None => NameValue::new(line, ""),
    }
}
