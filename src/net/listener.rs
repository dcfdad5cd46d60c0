//! TCP listener binding.
//!
//! # Responsibilities
//! - Bind to the configured address (host names are resolved)
//! - Report an occupied port as its own error
//! - Surface every other bind failure with its original message

use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// The address is already bound by another process.
    AddrInUse(String),
    /// Failed to bind to address.
    Bind(std::io::Error),
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::AddrInUse(addr) => write!(f, "Address {} is already in use", addr),
            ListenerError::Bind(e) => write!(f, "Failed to bind: {}", e),
        }
    }
}

impl std::error::Error for ListenerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListenerError::AddrInUse(_) => None,
            ListenerError::Bind(e) => Some(e),
        }
    }
}

/// Bind to the configured address.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, ListenerError> {
    let listener = TcpListener::bind(config.bind_address.as_str())
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AddrInUse => ListenerError::AddrInUse(config.bind_address.clone()),
            _ => ListenerError::Bind(e),
        })?;

    let local_addr = listener.local_addr().map_err(ListenerError::Bind)?;
    tracing::info!(address = %local_addr, "Listener bound");

    Ok(listener)
}
