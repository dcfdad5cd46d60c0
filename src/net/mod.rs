//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig.bind_address
//!     → listener.rs (resolve host, bind)
//!     → TcpListener handed to the HTTP layer
//! ```
//!
//! # Design Decisions
//! - Binding happens only after the registry is built
//! - Address-in-use is a distinct error, never retried

pub mod listener;

pub use listener::{bind, ListenerError};
