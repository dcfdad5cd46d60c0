//! Endpoint lookup table.
//!
//! # Responsibilities
//! - Key every entry as `METHOD:/proxy{path}`
//! - Keep the last entry registered for a key
//! - Answer exact lookups with an explicit miss
//!
//! # Design Decisions
//! - Built once before the listener binds, read-only afterwards (no locks)
//! - Insertion order of first occurrence is kept for listing
//! - No wildcard, trailing-slash or case folding of the path

use std::sync::Arc;

use indexmap::IndexMap;

use crate::entry::Entry;

/// Path prefix under which all recorded endpoints are served.
pub const PROXY_PREFIX: &str = "/proxy";

/// Rewrite a recorded path into the proxy namespace.
pub fn proxied_path(path: &str) -> String {
    format!("{PROXY_PREFIX}{path}")
}

/// Composite registry key for a method and an already proxied path.
pub fn endpoint_key(method: &str, path: &str) -> String {
    format!("{}:{}", method.to_uppercase(), path)
}

/// Maps `METHOD:/proxy{path}` to the entry replayed for it.
#[derive(Debug, Default, Clone)]
pub struct EndpointRegistry {
    endpoints: IndexMap<String, Arc<Entry>>,
}

impl EndpointRegistry {
    /// Build the registry from entries in ingestion order. Later entries win.
    pub fn build_endpoint_map(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut endpoints = IndexMap::new();
        for entry in entries {
            let key = endpoint_key(&entry.method, &proxied_path(&entry.path));
            if let Some(previous) = endpoints.insert(key, Arc::new(entry)) {
                tracing::trace!(
                    method = %previous.method,
                    path = %previous.path,
                    "Recording superseded by a later entry"
                );
            }
        }
        Self { endpoints }
    }

    /// Exact lookup for an inbound method and a query-free request path.
    pub fn find_matching_entry(&self, method: &str, path: &str) -> Option<Arc<Entry>> {
        self.endpoints.get(&endpoint_key(method, path)).cloned()
    }

    /// Number of distinct endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Iterate `(key, entry)` pairs in first-registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.endpoints.iter().map(|(k, v)| (k.as_str(), &**v))
    }
}
