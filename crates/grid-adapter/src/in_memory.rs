//! In-Memory Adapter Implementation
//!
//! Keeps event and subscription registrations in process memory behind
//! `tokio::sync::RwLock`. Unlike the no-op backend it enforces the full
//! ownership contract: only names created through this instance can be
//! deleted. Suitable for:
//! - Development without a serverless cluster
//! - Tests that need create/delete to be observable through `list`

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{Adapter, AdapterError, AdapterResult, EventManager, SubscriptionManager};

/// In-memory backend for events and subscriptions
#[derive(Debug, Clone)]
pub struct InMemoryAdapter {
    subscriptions: InMemorySubscriptionManager,
    events: InMemoryEventManager,
}

impl InMemoryAdapter {
    /// Create an adapter with empty registries
    pub fn new() -> Self {
        Self {
            subscriptions: InMemorySubscriptionManager(Registry::new("subscription")),
            events: InMemoryEventManager(Registry::new("event")),
        }
    }

    /// Get current statistics
    pub async fn stats(&self) -> InMemoryStats {
        InMemoryStats {
            subscription_count: self.subscriptions.0.len().await,
            event_count: self.events.0.len().await,
        }
    }
}

impl Default for InMemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for the in-memory adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InMemoryStats {
    pub subscription_count: usize,
    pub event_count: usize,
}

#[async_trait]
impl Adapter for InMemoryAdapter {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn instances(&self) -> AdapterResult<usize> {
        // Nothing is deployed, registrations only.
        Ok(0)
    }

    fn subscription_manager(&self) -> &dyn SubscriptionManager {
        &self.subscriptions
    }

    fn event_manager(&self) -> &dyn EventManager {
        &self.events
    }
}

/// Ordered set of names owned by one manager
#[derive(Debug, Clone)]
struct Registry {
    kind: &'static str,
    names: Arc<RwLock<BTreeSet<String>>>,
}

impl Registry {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            names: Arc::new(RwLock::new(BTreeSet::new())),
        }
    }

    async fn create(&self, name: &str) -> AdapterResult<()> {
        if name.trim().is_empty() {
            return Err(AdapterError::InvalidName(name.to_string()));
        }
        let mut names = self.names.write().await;
        if !names.insert(name.to_string()) {
            return Err(AdapterError::AlreadyExists(format!("{} {}", self.kind, name)));
        }
        debug!("Created {} {}", self.kind, name);
        Ok(())
    }

    async fn delete(&self, name: &str) -> AdapterResult<()> {
        let mut names = self.names.write().await;
        if !names.remove(name) {
            return Err(AdapterError::NotFound(format!("{} {}", self.kind, name)));
        }
        debug!("Deleted {} {}", self.kind, name);
        Ok(())
    }

    async fn list(&self) -> Vec<String> {
        self.names.read().await.iter().cloned().collect()
    }

    async fn len(&self) -> usize {
        self.names.read().await.len()
    }
}

#[derive(Debug, Clone)]
pub struct InMemorySubscriptionManager(Registry);

#[async_trait]
impl SubscriptionManager for InMemorySubscriptionManager {
    async fn create(&self, name: &str) -> AdapterResult<()> {
        self.0.create(name).await
    }

    async fn delete(&self, name: &str) -> AdapterResult<()> {
        self.0.delete(name).await
    }

    async fn list(&self) -> AdapterResult<Vec<String>> {
        Ok(self.0.list().await)
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryEventManager(Registry);

#[async_trait]
impl EventManager for InMemoryEventManager {
    async fn create(&self, name: &str) -> AdapterResult<()> {
        self.0.create(name).await
    }

    async fn delete(&self, name: &str) -> AdapterResult<()> {
        self.0.delete(name).await
    }

    async fn list(&self) -> AdapterResult<Vec<String>> {
        Ok(self.0.list().await)
    }
}
