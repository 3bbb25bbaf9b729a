//! # Grid HTTP Server Prelude
//!
//! ```rust
//! use grid_http_server::prelude::*;
//! ```

// Core server types
pub use crate::handler::{GridHttpHandler, Resource};
pub use crate::server::{GridServer, GridServerBuilder, ServerConfig};

// Adapter types
pub use grid_adapter::prelude::*;

// Cancellation
pub use crate::CancellationToken;

// Error types
pub use crate::{GridError, Result};
