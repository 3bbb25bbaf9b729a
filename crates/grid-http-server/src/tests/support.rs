//! Adapters and helpers shared by the server tests

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::Response;
use serde_json::Value;
use tokio::sync::Notify;

use grid_adapter::{Adapter, AdapterError, AdapterResult, EventManager, SubscriptionManager};

/// Adapter whose managers fail every call
pub struct FailingAdapter;

#[async_trait]
impl Adapter for FailingAdapter {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn instances(&self) -> AdapterResult<usize> {
        Err(AdapterError::backend("cluster unreachable"))
    }

    fn subscription_manager(&self) -> &dyn SubscriptionManager {
        self
    }

    fn event_manager(&self) -> &dyn EventManager {
        self
    }
}

#[async_trait]
impl SubscriptionManager for FailingAdapter {
    async fn create(&self, _name: &str) -> AdapterResult<()> {
        Err(AdapterError::backend("cluster unreachable"))
    }

    async fn delete(&self, _name: &str) -> AdapterResult<()> {
        Err(AdapterError::backend("cluster unreachable"))
    }

    async fn list(&self) -> AdapterResult<Vec<String>> {
        Err(AdapterError::backend("subscriptions unavailable"))
    }
}

#[async_trait]
impl EventManager for FailingAdapter {
    async fn create(&self, _name: &str) -> AdapterResult<()> {
        Err(AdapterError::backend("cluster unreachable"))
    }

    async fn delete(&self, _name: &str) -> AdapterResult<()> {
        Err(AdapterError::backend("cluster unreachable"))
    }

    async fn list(&self) -> AdapterResult<Vec<String>> {
        Err(AdapterError::backend("events unavailable"))
    }
}

/// Adapter whose event listing parks until released
#[derive(Default)]
pub struct ParkedAdapter {
    /// Signalled when a listing call has started
    pub entered: Notify,
    /// Signal to let parked listings return
    pub release: Notify,
}

impl ParkedAdapter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl Adapter for ParkedAdapter {
    fn name(&self) -> &'static str {
        "parked"
    }

    async fn instances(&self) -> AdapterResult<usize> {
        Ok(1)
    }

    fn subscription_manager(&self) -> &dyn SubscriptionManager {
        self
    }

    fn event_manager(&self) -> &dyn EventManager {
        self
    }
}

#[async_trait]
impl SubscriptionManager for ParkedAdapter {
    async fn create(&self, _name: &str) -> AdapterResult<()> {
        Ok(())
    }

    async fn delete(&self, _name: &str) -> AdapterResult<()> {
        Ok(())
    }

    async fn list(&self) -> AdapterResult<Vec<String>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl EventManager for ParkedAdapter {
    async fn create(&self, _name: &str) -> AdapterResult<()> {
        Ok(())
    }

    async fn delete(&self, _name: &str) -> AdapterResult<()> {
        Ok(())
    }

    async fn list(&self) -> AdapterResult<Vec<String>> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(vec!["parked.event".to_string()])
    }
}

/// Decode a response body as JSON
pub async fn json_body(response: Response<Full<Bytes>>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
