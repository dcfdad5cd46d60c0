//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, raw target)
//!     → routing::resolve (replay decision)
//!     → response.rs (replayed / preflight / 404) or dashboard.rs (GET /)
//!     → Send to client
//! ```

pub mod dashboard;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, ReplayServer};
