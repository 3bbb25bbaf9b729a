//! Placeholder platform adapters
//!
//! Knative and the other platform integrations live outside this workspace.
//! Selecting one of them yields an adapter that answers every call with
//! [`AdapterError::NotImplemented`], so the HTTP surface reports the gap as a
//! server error instead of pretending the backend is empty.

use std::fmt;

use async_trait::async_trait;

use crate::{Adapter, AdapterError, AdapterResult, EventManager, SubscriptionManager};

/// Serverless platforms with a reserved adapter slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Knative,
    PlatformB,
    PlatformC,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Knative => "knative",
            Platform::PlatformB => "platformb",
            Platform::PlatformC => "platformc",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adapter for a platform whose integration is not wired in
#[derive(Debug, Clone, Copy)]
pub struct PlatformAdapter {
    platform: Platform,
    subscriptions: PlatformSubscriptionManager,
    events: PlatformEventManager,
}

impl PlatformAdapter {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            subscriptions: PlatformSubscriptionManager { platform },
            events: PlatformEventManager { platform },
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }
}

fn unimplemented(platform: Platform, operation: &'static str) -> AdapterError {
    AdapterError::NotImplemented {
        platform: platform.as_str(),
        operation,
    }
}

#[async_trait]
impl Adapter for PlatformAdapter {
    fn name(&self) -> &'static str {
        self.platform.as_str()
    }

    async fn instances(&self) -> AdapterResult<usize> {
        Err(unimplemented(self.platform, "instance count"))
    }

    fn subscription_manager(&self) -> &dyn SubscriptionManager {
        &self.subscriptions
    }

    fn event_manager(&self) -> &dyn EventManager {
        &self.events
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlatformSubscriptionManager {
    platform: Platform,
}

#[async_trait]
impl SubscriptionManager for PlatformSubscriptionManager {
    async fn create(&self, _name: &str) -> AdapterResult<()> {
        Err(unimplemented(self.platform, "subscription creation"))
    }

    async fn delete(&self, _name: &str) -> AdapterResult<()> {
        Err(unimplemented(self.platform, "subscription deletion"))
    }

    async fn list(&self) -> AdapterResult<Vec<String>> {
        Err(unimplemented(self.platform, "subscription listing"))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlatformEventManager {
    platform: Platform,
}

#[async_trait]
impl EventManager for PlatformEventManager {
    async fn create(&self, _name: &str) -> AdapterResult<()> {
        Err(unimplemented(self.platform, "event creation"))
    }

    async fn delete(&self, _name: &str) -> AdapterResult<()> {
        Err(unimplemented(self.platform, "event deletion"))
    }

    async fn list(&self) -> AdapterResult<Vec<String>> {
        Err(unimplemented(self.platform, "event listing"))
    }
}
