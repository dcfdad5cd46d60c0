//! HAR file ingestion feeding the registry.

use std::io::Write;

use har_replay::entry::{format_entry, parse_entry};
use har_replay::har::load_har_file;
use har_replay::lifecycle::{load_registry, StartupError};
use serde_json::json;

mod common;

use common::{har_document, har_entry};

fn write_har(doc: &serde_json::Value) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(doc.to_string().as_bytes()).unwrap();
    file
}

#[test]
fn test_registry_counts_distinct_endpoints() {
    let doc = har_document(vec![
        har_entry("GET", "https://api.test/items?page=1", 200, json!([]), "p1"),
        har_entry("GET", "https://api.test/items?page=2", 200, json!([]), "p2"),
        har_entry("POST", "https://api.test/items", 201, json!([]), "created"),
        har_entry("get", "https://api.test/items/1", 200, json!([]), "one"),
    ]);
    let file = write_har(&doc);

    let registry = load_registry(file.path()).unwrap();
    assert_eq!(registry.len(), 3);
    assert_eq!(
        registry
            .find_matching_entry("GET", "/proxy/items")
            .unwrap()
            .response_body,
        "p2"
    );
}

#[test]
fn test_partially_broken_file_still_loads() {
    let doc = har_document(vec![
        har_entry("GET", "https://api.test/ok", 200, json!([]), "fine"),
        json!({ "request": "nope" }),
    ]);
    let file = write_har(&doc);

    let result = load_har_file(file.path());
    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Error parsing entry 1:"));
    assert!(!result.should_abort());
}

#[test]
fn test_malformed_file_aborts() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{\"log\": {\"entries\": [").unwrap();

    match load_registry(file.path()) {
        Err(StartupError::NoEntries { errors, .. }) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].starts_with("Failed to parse HAR JSON"));
        }
        other => panic!("expected NoEntries, got {other:?}"),
    }
}

#[test]
fn test_ingested_entries_survive_text_export() {
    let headers = json!([
        { "name": "Content-Type", "value": "text/plain" },
        { "name": "Cache-Control", "value": "max-age=60" }
    ]);
    let doc = har_document(vec![har_entry(
        "GET",
        "https://api.test/greeting?lang=en",
        200,
        headers,
        "hello\nworld",
    )]);
    let file = write_har(&doc);

    let result = load_har_file(file.path());
    let original = &result.entries[0];
    let parsed = parse_entry(&format_entry(original)).unwrap();

    assert_eq!(parsed.method, original.method);
    assert_eq!(parsed.path, original.path);
    assert_eq!(parsed.status, original.status);
    assert_eq!(parsed.content_type, original.content_type);
    assert_eq!(parsed.timestamp, original.timestamp);
    assert_eq!(parsed.request_headers, original.request_headers);
    assert_eq!(parsed.response_headers, original.response_headers);
    assert_eq!(parsed.response_body, original.response_body);
}
