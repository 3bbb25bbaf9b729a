//! Shared utilities for Grid end-to-end tests
//!
//! Starts a real server on an ephemeral loopback port and talks to it over
//! HTTP with `reqwest`.

use std::net::SocketAddr;
use std::sync::{Arc, Once};

use async_trait::async_trait;
use tokio::sync::{Notify, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

use grid_adapter::{Adapter, AdapterError, AdapterResult, EventManager, SubscriptionManager};
use grid_http_server::{CancellationToken, GridServer, GridServerBuilder};

static TRACING: Once = Once::new();

/// Install a test subscriber once per test binary (`RUST_LOG` controls output)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A running Grid server bound to an ephemeral port
pub struct TestServer {
    pub server: Arc<GridServer>,
    pub cancel: CancellationToken,
    pub handle: JoinHandle<grid_http_server::Result<()>>,
    pub addr: SocketAddr,
    client: reqwest::Client,
}

impl TestServer {
    /// Start `builder` on `127.0.0.1:0` and wait for the on-listen signal
    pub async fn start(builder: GridServerBuilder) -> Self {
        init_tracing();

        let (listening_tx, listening_rx) = oneshot::channel();
        let server = Arc::new(
            builder
                .address("127.0.0.1:0")
                .on_listen(move || {
                    let _ = listening_tx.send(());
                })
                .build(),
        );
        let cancel = CancellationToken::new();
        let handle = tokio::spawn({
            let server = Arc::clone(&server);
            let cancel = cancel.clone();
            async move { server.serve(cancel).await }
        });

        listening_rx.await.expect("server should signal listening");
        let addr = server.addr().expect("server should report its address");
        debug!("Test server listening on {}", addr);

        Self {
            server,
            cancel,
            handle,
            addr,
            client: reqwest::Client::new(),
        }
    }

    /// Absolute URL for `path` on this server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Cancel and wait for `serve` to return
    pub async fn shutdown(self) -> grid_http_server::Result<()> {
        self.cancel.cancel();
        self.handle.await.expect("serve task should not panic")
    }
}

/// Adapter whose event listing waits until released
#[derive(Default)]
pub struct GatedAdapter {
    pub entered: Notify,
    pub release: Notify,
}

#[async_trait]
impl Adapter for GatedAdapter {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn instances(&self) -> AdapterResult<usize> {
        Ok(0)
    }

    fn subscription_manager(&self) -> &dyn SubscriptionManager {
        self
    }

    fn event_manager(&self) -> &dyn EventManager {
        self
    }
}

#[async_trait]
impl EventManager for GatedAdapter {
    async fn create(&self, _name: &str) -> AdapterResult<()> {
        Ok(())
    }

    async fn delete(&self, name: &str) -> AdapterResult<()> {
        Err(AdapterError::NotFound(name.to_string()))
    }

    async fn list(&self) -> AdapterResult<Vec<String>> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(vec!["gated.event".to_string()])
    }
}

#[async_trait]
impl SubscriptionManager for GatedAdapter {
    async fn create(&self, _name: &str) -> AdapterResult<()> {
        Ok(())
    }

    async fn delete(&self, name: &str) -> AdapterResult<()> {
        Err(AdapterError::NotFound(name.to_string()))
    }

    async fn list(&self) -> AdapterResult<Vec<String>> {
        Ok(Vec::new())
    }
}
