//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use har_replay::config::ReplayConfig;
use har_replay::har::ingest_document;
use har_replay::{EndpointRegistry, ReplayServer, Shutdown};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// A replay server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Build a HAR log entry.
pub fn har_entry(method: &str, url: &str, status: u16, headers: Value, text: &str) -> Value {
    json!({
        "startedDateTime": "2024-06-01T08:30:00.000Z",
        "request": {
            "method": method,
            "url": url,
            "headers": [{ "name": "Accept", "value": "*/*" }],
            "queryString": []
        },
        "response": {
            "status": status,
            "headers": headers,
            "content": { "size": text.len(), "text": text }
        }
    })
}

/// Wrap entries in a HAR document.
pub fn har_document(entries: Vec<Value>) -> Value {
    json!({
        "log": {
            "version": "1.2",
            "creator": { "name": "test", "version": "1" },
            "entries": entries
        }
    })
}

/// Ingest a document and serve it.
pub async fn start_server(doc: &Value, cors: bool) -> TestServer {
    let result = ingest_document(doc);
    assert!(result.errors.is_empty(), "fixture errors: {:?}", result.errors);

    let mut config = ReplayConfig::default();
    config.cors.enabled = cors;
    config.observability.log_requests = false;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = ReplayServer::new(config, EndpointRegistry::build_endpoint_map(result.entries));
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer { addr, shutdown }
}

/// HTTP client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
