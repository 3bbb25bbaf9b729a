//! End-to-end lifecycle tests: readiness, cancellation and graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};

use grid_http_server::{CancellationToken, GridError, GridServer};
use grid_test_support::{GatedAdapter, TestServer};

#[tokio::test]
async fn test_start_and_cancel_on_listen() {
    let cancel = CancellationToken::new();
    let server = GridServer::builder()
        .address("127.0.0.1:0")
        .on_listen({
            let cancel = cancel.clone();
            move || cancel.cancel()
        })
        .build();

    server.serve(cancel).await.unwrap();
}

#[tokio::test]
async fn test_in_flight_request_finishes_before_close() {
    let adapter = Arc::new(GatedAdapter::default());
    let server = TestServer::start(GridServer::builder().adapter(adapter.clone())).await;

    let request = tokio::spawn({
        let client = server.client().clone();
        let url = server.url("/v1/events");
        async move { client.get(url).send().await }
    });

    adapter.entered.notified().await;
    server.cancel.cancel();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!server.handle.is_finished());

    adapter.release.notify_one();
    let response = request.await.unwrap().expect("in-flight request should complete");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await.unwrap(), json!(["gated.event"]));

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_no_new_connections_after_shutdown() {
    let server = TestServer::start(GridServer::builder()).await;
    let url = server.url("/v1/version");
    let client = server.client().clone();

    assert_eq!(client.get(&url).send().await.unwrap().status(), StatusCode::OK);
    server.shutdown().await.unwrap();

    let fresh = reqwest::Client::new();
    assert!(fresh.get(&url).send().await.is_err());
}

#[tokio::test]
async fn test_shutdown_timeout_surfaces_as_error() {
    let adapter = Arc::new(GatedAdapter::default());
    let server = TestServer::start(
        GridServer::builder()
            .adapter(adapter.clone())
            .shutdown_timeout(Duration::from_millis(100)),
    )
    .await;

    let _request = tokio::spawn({
        let client = server.client().clone();
        let url = server.url("/v1/events");
        async move { client.get(url).send().await }
    });
    adapter.entered.notified().await;

    let result = server.shutdown().await;
    assert!(matches!(result, Err(GridError::ShutdownTimeout(_))), "{:?}", result);
}

#[tokio::test]
async fn test_server_cannot_be_started_twice() {
    let server = TestServer::start(GridServer::builder()).await;

    let result = server.server.serve(CancellationToken::new()).await;
    assert!(matches!(result, Err(GridError::AlreadyStarted)));

    server.shutdown().await.unwrap();
}
