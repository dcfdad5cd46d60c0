//! HAR loading from disk.

use std::fs;
use std::path::Path;

use crate::har::ingest::{ingest_str, IngestResult};

/// Read a HAR file and ingest it.
///
/// An unreadable file is reported as a single error with no entries.
pub fn load_har_file(path: &Path) -> IngestResult {
    match fs::read_to_string(path) {
        Ok(content) => ingest_str(&content),
        Err(e) => IngestResult::failed(format!(
            "Failed to read HAR file {}: {}",
            path.display(),
            e
        )),
    }
}
