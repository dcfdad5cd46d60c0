//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the replay handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve on a bound listener until shutdown
//! - Dispatch each request through the replay decision
//! - Observability (request log, metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ReplayConfig;
use crate::http::{dashboard, request, response};
use crate::observability::{logging, metrics};
use crate::routing::{resolve, strip_query_params, EndpointRegistry, RouteDecision};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<EndpointRegistry>,
    pub cors_enabled: bool,
    pub log_requests: bool,
}

/// HTTP server replaying a frozen endpoint registry.
pub struct ReplayServer {
    router: Router,
    config: ReplayConfig,
    registry: Arc<EndpointRegistry>,
}

impl ReplayServer {
    /// Create a new server over an already built registry.
    pub fn new(config: ReplayConfig, registry: EndpointRegistry) -> Self {
        let registry = Arc::new(registry);
        let state = AppState {
            registry: registry.clone(),
            cors_enabled: config.cors.enabled,
            log_requests: config.observability.log_requests,
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            registry,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ReplayConfig, state: AppState) -> Router {
        Router::new()
            .fallback(replay_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener until shutdown fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            endpoints = self.registry.len(),
            cors = self.config.cors.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the server in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Get a reference to the registry being served.
    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }
}

/// Main replay handler.
/// Resolves the request against the registry and builds the answer.
async fn replay_handler(State(state): State<AppState>, req: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request::request_id(req.headers()).to_string();
    let method = req.method().as_str().to_string();
    let target = request::request_target(req.uri()).to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        target = %target,
        "Replaying request"
    );

    let (response, outcome) = match resolve(&state.registry, &method, &target, state.cors_enabled) {
        RouteDecision::Dashboard => (
            dashboard::render(&state.registry, state.cors_enabled).into_response(),
            "dashboard",
        ),
        RouteDecision::CorsPreflight => (response::cors_preflight(), "preflight"),
        RouteDecision::OutsideNamespace { path } => {
            tracing::debug!(request_id = %request_id, path = %path, "Path outside proxy namespace");
            (response::outside_namespace(&path), "outside_namespace")
        }
        RouteDecision::Miss { method, path } => {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, "No recording matched");
            (response::no_recording(&method, &path), "miss")
        }
        RouteDecision::Hit(entry) => (response::replay(&entry, state.cors_enabled), "hit"),
    };

    let status = response.status().as_u16();
    metrics::record_request(&method, status, outcome, start_time);
    if state.log_requests {
        logging::log_request(&method, strip_query_params(&target), status, start_time.elapsed());
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Entry, NameValue};
    use axum::http::{header, StatusCode};
    use tower::ServiceExt;

    fn entry(method: &str, path: &str, status: u16, body: &str) -> Entry {
        Entry {
            method: method.into(),
            url: format!("https://api.test{path}"),
            path: path.into(),
            query_string: Vec::new(),
            request_headers: Vec::new(),
            status,
            response_headers: vec![
                NameValue::new("Content-Type", "application/json"),
                NameValue::new("Content-Encoding", "br"),
            ],
            response_body: body.into(),
            content_type: "application/json".into(),
            timestamp: String::new(),
        }
    }

    fn server(cors: bool) -> ReplayServer {
        let mut config = ReplayConfig::default();
        config.cors.enabled = cors;
        ReplayServer::new(
            config,
            EndpointRegistry::build_endpoint_map(vec![
                entry("GET", "/users", 200, "A"),
                entry("GET", "/users", 404, "B"),
                entry("POST", "/orders", 201, r#"{"id":1}"#),
            ]),
        )
    }

    async fn send(router: Router, method: &str, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_last_recording_is_replayed() {
        let (status, headers, body) = send(server(true).router(), "GET", "/proxy/users?page=1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "B");
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert!(headers.get(header::CONTENT_ENCODING).is_none());
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(headers.contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_method_is_part_of_key() {
        let (status, _, body) = send(server(false).router(), "POST", "/proxy/orders").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, r#"{"id":1}"#);

        let (status, _, body) = send(server(false).router(), "GET", "/proxy/orders").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Not Found");
        assert_eq!(json["message"], "No HAR entry found for GET /proxy/orders");
    }

    #[tokio::test]
    async fn test_outside_namespace() {
        let (status, _, body) = send(server(true).router(), "GET", "/users").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            json["message"],
            "Path /users is not a proxy endpoint. HAR endpoints are available under /proxy/*"
        );
    }

    #[tokio::test]
    async fn test_preflight() {
        let (status, headers, body) = send(server(true).router(), "OPTIONS", "/proxy/anything").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], response::CORS_ALLOW_HEADERS);

        let (status, headers, _) = send(server(false).router(), "OPTIONS", "/proxy/anything").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn test_dashboard() {
        let (status, headers, body) = send(server(true).router(), "GET", "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        assert!(body.contains("2 endpoints recorded"));
    }
}
