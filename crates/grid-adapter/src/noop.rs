//! No-op adapter
//!
//! Reference backend that performs no work: lists are always empty, the
//! instance count is zero and writes succeed without effect. Used for the
//! `local` backend and for exercising the HTTP front end in isolation.

use async_trait::async_trait;
use tracing::debug;

use crate::{Adapter, AdapterResult, EventManager, SubscriptionManager};

/// Adapter backed by nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAdapter {
    subscriptions: NoopSubscriptionManager,
    events: NoopEventManager,
}

impl NoopAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Adapter for NoopAdapter {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn instances(&self) -> AdapterResult<usize> {
        Ok(0)
    }

    fn subscription_manager(&self) -> &dyn SubscriptionManager {
        &self.subscriptions
    }

    fn event_manager(&self) -> &dyn EventManager {
        &self.events
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSubscriptionManager;

#[async_trait]
impl SubscriptionManager for NoopSubscriptionManager {
    async fn create(&self, name: &str) -> AdapterResult<()> {
        debug!("noop: ignoring subscription create {}", name);
        Ok(())
    }

    async fn delete(&self, name: &str) -> AdapterResult<()> {
        debug!("noop: ignoring subscription delete {}", name);
        Ok(())
    }

    async fn list(&self) -> AdapterResult<Vec<String>> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventManager;

#[async_trait]
impl EventManager for NoopEventManager {
    async fn create(&self, name: &str) -> AdapterResult<()> {
        debug!("noop: ignoring event create {}", name);
        Ok(())
    }

    async fn delete(&self, name: &str) -> AdapterResult<()> {
        debug!("noop: ignoring event delete {}", name);
        Ok(())
    }

    async fn list(&self) -> AdapterResult<Vec<String>> {
        Ok(Vec::new())
    }
}
