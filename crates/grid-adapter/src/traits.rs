//! Adapter Capability Traits
//!
//! This module provides the capability set every serverless backend has to
//! satisfy before Grid can front it:
//! - `Adapter`: instance reporting plus access to the two resource managers
//! - `SubscriptionManager`: registrations of interest in event streams
//! - `EventManager`: registrations of emittable event types
//!
//! Implementations are shared across every in-flight request, so all of them
//! must be `Send + Sync` and safe to call concurrently without external locking.

use async_trait::async_trait;

/// Result type for adapter operations
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

/// Core trait for serverless backend adapters
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Get the backend name for logging and debugging
    fn name(&self) -> &'static str;

    /// Number of running compute instances managed by the backend
    async fn instances(&self) -> AdapterResult<usize>;

    /// Manager for subscriptions held by this adapter
    fn subscription_manager(&self) -> &dyn SubscriptionManager;

    /// Manager for event registrations held by this adapter
    fn event_manager(&self) -> &dyn EventManager;
}

/// Subscription manager
#[async_trait]
pub trait SubscriptionManager: Send + Sync {
    /// Create a new subscription
    async fn create(&self, name: &str) -> AdapterResult<()>;

    /// Delete a subscription.
    ///
    /// Must fail (or do nothing) when the subscription was not created by this
    /// adapter instance.
    async fn delete(&self, name: &str) -> AdapterResult<()>;

    /// List all active subscriptions.
    ///
    /// The result is a snapshot; order is only stable within one call.
    async fn list(&self) -> AdapterResult<Vec<String>>;
}

/// Event manager for registering emitted events
#[async_trait]
pub trait EventManager: Send + Sync {
    /// Create an event registration
    async fn create(&self, name: &str) -> AdapterResult<()>;

    /// Delete an event registration (must have been created by this adapter).
    async fn delete(&self, name: &str) -> AdapterResult<()>;

    /// List all available events
    async fn list(&self) -> AdapterResult<Vec<String>>;
}

/// Unified error type for all adapter backends
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error("{operation} is not implemented by the {platform} adapter")]
    NotImplemented {
        platform: &'static str,
        operation: &'static str,
    },

    #[error("Backend error: {0}")]
    Backend(String),
}

impl AdapterError {
    /// Shorthand for a backend failure with a free-form message
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
