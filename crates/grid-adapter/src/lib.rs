//! # Grid Adapters
//!
//! **Pluggable serverless backends behind a single capability set.**
//!
//! Provides the [`Adapter`] trait with its [`SubscriptionManager`] and
//! [`EventManager`] sub-capabilities, together with the backends shipped in
//! this workspace:
//! - `local`: [`NoopAdapter`], performs no work
//! - `memory`: [`InMemoryAdapter`], process-local registrations
//! - `knative`, `platformb`, `platformc`: [`PlatformAdapter`] placeholders
//!
//! ```rust
//! use grid_adapter::{Adapter, AdapterKind, create_adapter};
//!
//! let adapter = create_adapter("memory".parse::<AdapterKind>().unwrap());
//! assert_eq!(adapter.name(), "memory");
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// Core traits and types
mod traits;
/// Adapter capability traits and error types
pub use traits::*;

// Implementations
pub mod in_memory;
pub mod noop;
pub mod platform;
pub mod prelude;

pub use in_memory::{InMemoryAdapter, InMemoryStats};
pub use noop::NoopAdapter;
pub use platform::{Platform, PlatformAdapter};

/// Adapter shared across every request handler
pub type SharedAdapter = Arc<dyn Adapter>;

/// Backend selected by name at process start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdapterKind {
    /// No-op backend
    #[default]
    Local,
    /// In-memory registrations
    Memory,
    /// Reserved platform integration
    Platform(Platform),
}

impl AdapterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterKind::Local => "local",
            AdapterKind::Memory => "memory",
            AdapterKind::Platform(platform) => platform.as_str(),
        }
    }
}

impl FromStr for AdapterKind {
    type Err = Infallible;

    /// Unknown names fall back to the local backend.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => AdapterKind::Memory,
            "knative" => AdapterKind::Platform(Platform::Knative),
            "platformb" => AdapterKind::Platform(Platform::PlatformB),
            "platformc" => AdapterKind::Platform(Platform::PlatformC),
            _ => AdapterKind::Local,
        };
        Ok(kind)
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Create the adapter for a backend kind
pub fn create_adapter(kind: AdapterKind) -> SharedAdapter {
    match kind {
        AdapterKind::Local => Arc::new(NoopAdapter::new()),
        AdapterKind::Memory => Arc::new(InMemoryAdapter::new()),
        AdapterKind::Platform(platform) => Arc::new(PlatformAdapter::new(platform)),
    }
}
