//! # Grid HTTP Server
//!
//! This crate provides the HTTP front end of the Grid control plane: a
//! single-use service lifecycle (listen, serve, bounded graceful shutdown) and
//! the small routed API that delegates to the bound backend adapter.
//!
//! ## Routes
//! - `GET /v1/version`: the configured version string
//! - `GET /v1/events`: event names from the adapter's event manager
//! - `GET /v1/subscriptions`: subscription names from the subscription manager
//!
//! Writes on events and subscriptions answer `501 Not Implemented`.

pub mod handler;
pub mod prelude;
pub mod server;

#[cfg(test)]
mod tests;

use std::time::Duration;

// Re-export main types
pub use handler::{GridHttpHandler, JSON_CONTENT_TYPE, Resource};
pub use server::{
    DEFAULT_ADDRESS, DEFAULT_SHUTDOWN_TIMEOUT, GridServer, GridServerBuilder, ServerConfig,
};

// Re-export foundational types
pub use grid_adapter::{Adapter, AdapterError, SharedAdapter};
pub use tokio_util::sync::CancellationToken;

/// Result type for Grid server operations
pub type Result<T> = std::result::Result<T, GridError>;

/// Grid server errors
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("Invalid listen address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to listen on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server already started")]
    AlreadyStarted,

    #[error("Serve error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("Graceful shutdown did not complete within {0:?}")]
    ShutdownTimeout(Duration),

    #[error("Accept loop terminated abnormally: {0}")]
    Join(String),
}
