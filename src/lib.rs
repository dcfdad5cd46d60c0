//! HAR replay server library.
//!
//! Replays HTTP exchanges recorded in a HAR archive from a local mock server.
//! Recorded endpoints are served under `/proxy`; `GET /` lists them.

pub mod config;
pub mod entry;
pub mod har;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::ReplayConfig;
pub use entry::Entry;
pub use http::ReplayServer;
pub use lifecycle::Shutdown;
pub use routing::EndpointRegistry;
