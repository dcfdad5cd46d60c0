//! Startup orchestration.
//!
//! # Responsibilities
//! - Ingest the HAR file and freeze the endpoint registry
//! - Start the optional metrics exporter
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: nothing loaded, or port taken, is fatal
//! - Ingestion runs to completion before the listener binds
//! - Partial ingestion errors are logged and serving continues

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::broadcast;

use crate::config::ReplayConfig;
use crate::entry::format_entries;
use crate::har::load_har_file;
use crate::http::ReplayServer;
use crate::net::{self, ListenerError};
use crate::observability::metrics;
use crate::routing::EndpointRegistry;

/// Errors that stop the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no HAR file specified")]
    MissingHarPath,

    #[error("no entries could be loaded from {}", .path.display())]
    NoEntries { path: PathBuf, errors: Vec<String> },

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Ingest a HAR file into a registry, logging every ingestion error.
pub fn load_registry(path: &Path) -> Result<EndpointRegistry, StartupError> {
    let result = load_har_file(path);

    for error in &result.errors {
        tracing::warn!(error = %error, "HAR parse error");
    }

    if result.should_abort() {
        return Err(StartupError::NoEntries {
            path: path.to_path_buf(),
            errors: result.errors,
        });
    }

    let entry_count = result.entries.len();
    let registry = EndpointRegistry::build_endpoint_map(result.entries);

    tracing::info!(
        path = %path.display(),
        entries = entry_count,
        endpoints = registry.len(),
        skipped = result.errors.len(),
        "HAR file loaded"
    );
    metrics::record_endpoints(registry.len());

    Ok(registry)
}

/// Text export of a HAR file, produced instead of serving.
#[derive(Debug)]
pub struct Dump {
    /// Every loaded entry rendered as a text block, blocks separated by a blank line.
    pub text: String,
    /// Ingestion errors for the entries that were skipped.
    pub errors: Vec<String>,
}

/// Ingest a HAR file and render its entries. Aborts under the same policy as serving.
pub fn dump_har_file(path: &Path) -> Result<Dump, StartupError> {
    let result = load_har_file(path);
    if result.should_abort() {
        return Err(StartupError::NoEntries {
            path: path.to_path_buf(),
            errors: result.errors,
        });
    }

    Ok(Dump {
        text: format_entries(&result.entries),
        errors: result.errors,
    })
}

/// Load, bind and serve until the shutdown receiver fires.
pub async fn start(
    config: ReplayConfig,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    let har_path = config.har.path.clone().ok_or(StartupError::MissingHarPath)?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let registry = load_registry(&har_path)?;
    let listener = net::bind(&config.listener).await?;

    ReplayServer::new(config, registry).run(listener, shutdown).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn har_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_registry_with_partial_errors() {
        let file = har_file(
            r#"{"log":{"entries":[
                {"request":{"method":"GET","url":"http://h/a"},"response":{"status":200}},
                {"request":{"method":"GET","url":"http://h/a"},"response":{"status":404}},
                {"request":{"method":"GET"},"response":{"status":200}}
            ]}}"#,
        );
        let registry = load_registry(file.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find_matching_entry("GET", "/proxy/a").unwrap().status, 404);
    }

    #[test]
    fn test_load_registry_aborts_when_nothing_loaded() {
        let file = har_file(r#"{"entries":[]}"#);
        match load_registry(file.path()) {
            Err(StartupError::NoEntries { errors, .. }) => assert_eq!(errors.len(), 1),
            other => panic!("expected NoEntries, got {other:?}"),
        }
    }

    #[test]
    fn test_dump_renders_loaded_entries() {
        let file = har_file(
            r#"{"log":{"entries":[
                {"startedDateTime":"t1","request":{"method":"get","url":"http://h/a"},"response":{"status":200}},
                {"request":{"method":"GET"},"response":{"status":200}},
                {"startedDateTime":"t2","request":{"method":"POST","url":"http://h/b"},
                 "response":{"status":201,"content":{"text":"ok"}}}
            ]}}"#,
        );

        let dump = dump_har_file(file.path()).unwrap();
        assert_eq!(
            dump.text,
            "GET /a 200 application/octet-stream [t1]\n\n\
             POST /b 201 application/octet-stream [t2]\nResponse Body:\n  ok\n"
        );
        assert_eq!(dump.errors.len(), 1);
        assert!(dump.errors[0].starts_with("Error parsing entry 1:"));
    }

    #[test]
    fn test_dump_aborts_when_nothing_loaded() {
        let file = har_file(r#"{"log":{"entries":[{"request":{"method":"GET"}}]}}"#);
        match dump_har_file(file.path()) {
            Err(StartupError::NoEntries { errors, .. }) => assert_eq!(errors.len(), 1),
            other => panic!("expected NoEntries, got {other:?}"),
        }

        let empty = har_file(r#"{"log":{"entries":[]}}"#);
        let dump = dump_har_file(empty.path()).unwrap();
        assert!(dump.text.is_empty());
        assert!(dump.errors.is_empty());
    }

    #[tokio::test]
    async fn test_start_requires_har_path() {
        let shutdown = crate::lifecycle::Shutdown::new();
        let err = start(ReplayConfig::default(), shutdown.subscribe()).await.unwrap_err();
        assert!(matches!(err, StartupError::MissingHarPath));
    }
}
