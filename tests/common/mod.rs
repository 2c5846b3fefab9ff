//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use edge_request_logger::config::{IngestionSettings, LoggerSettings};
use edge_request_logger::IngestBatch;

/// One request received by the mock ingestion endpoint.
#[derive(Debug)]
#[allow(dead_code)]
pub struct CapturedIngest {
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    pub batch: IngestBatch,
}

/// Start a mock ingestion endpoint at `/logs/ingest` answering `status`.
/// Returns the endpoint URL and a receiver of everything it received.
pub async fn start_mock_ingest(status: StatusCode) -> (String, mpsc::UnboundedReceiver<CapturedIngest>) {
    start_slow_ingest(status, Duration::ZERO).await
}

/// Like [`start_mock_ingest`], but each request is captured and answered only
/// after `delay`.
pub async fn start_slow_ingest(
    status: StatusCode,
    delay: Duration,
) -> (String, mpsc::UnboundedReceiver<CapturedIngest>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new()
        .route(
            "/logs/ingest",
            post(
                move |State(tx): State<mpsc::UnboundedSender<CapturedIngest>>,
                 Query(query): Query<HashMap<String, String>>,
                 headers: HeaderMap,
                 body: Bytes| async move {
                    let batch = serde_json::from_slice(&body).expect("ingest body is a batch");
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(CapturedIngest { query, headers, batch });
                    status
                },
            ),
        )
        .with_state(tx);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{addr}/logs/ingest"), rx)
}

/// Start an endpoint that accepts connections and closes them without answering.
#[allow(dead_code)]
pub async fn start_hangup_ingest() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}/logs/ingest")
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

#[allow(dead_code)]
pub fn ingestion(endpoint: &str) -> IngestionSettings {
    IngestionSettings {
        endpoint: endpoint.to_string(),
        api_key: "test-key".into(),
        hostname: "edge.example.net".into(),
        tag: "integration".into(),
        timeout: Some(Duration::from_secs(5)),
    }
}

#[allow(dead_code)]
pub fn settings(endpoint: &str) -> LoggerSettings {
    LoggerSettings::new("shop", Some("test".into()), ingestion(endpoint))
}

/// Wait for the next captured request, failing the test after two seconds.
#[allow(dead_code)]
pub async fn next_ingest(rx: &mut mpsc::UnboundedReceiver<CapturedIngest>) -> CapturedIngest {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("ingest request within timeout")
        .expect("mock ingest still running")
}
