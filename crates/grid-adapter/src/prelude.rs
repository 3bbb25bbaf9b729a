//! # Adapter Prelude
//!
//! Convenient re-exports of the most commonly used adapter types.
//!
//! ```rust
//! use grid_adapter::prelude::*;
//! ```

// Core traits and types
pub use crate::traits::{Adapter, AdapterError, AdapterResult, EventManager, SubscriptionManager};

// Implementations
pub use crate::in_memory::{InMemoryAdapter, InMemoryStats};
pub use crate::noop::NoopAdapter;
pub use crate::platform::{Platform, PlatformAdapter};

// Backend selection
pub use crate::{AdapterKind, SharedAdapter, create_adapter};
