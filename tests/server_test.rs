//! End-to-end tests of the demonstration edge server.

use std::net::SocketAddr;
use std::time::Duration;
use axum::http::StatusCode;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use edge_request_logger::config::LoggerConfig;
use edge_request_logger::{EdgeServer, Level, MetaValue, Shutdown};

mod common;

fn config(endpoint: &str) -> LoggerConfig {
    let mut config = LoggerConfig::default();
    config.logger.app_name = "edge-test".into();
    config.logger.environment = Some("ci".into());
    config.ingestion.endpoint = endpoint.to_string();
    config.ingestion.api_key = "test-key".into();
    config.ingestion.tag = "server".into();
    config
}

async fn start_server(
    config: LoggerConfig,
) -> (SocketAddr, Shutdown, mpsc::UnboundedSender<LoggerConfig>, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let (updates_tx, updates_rx) = mpsc::unbounded_channel();

    let server = EdgeServer::new(config);
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    (addr, shutdown, updates_tx, handle)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_request_is_logged_and_flushed() {
    let (endpoint, mut rx) = common::start_mock_ingest(StatusCode::OK).await;
    let (addr, shutdown, _updates, _server) = start_server(config(&endpoint)).await;

    let res = client()
        .get(format!("http://{addr}/hello?x=1"))
        .header("cf-connecting-ip", "203.0.113.9")
        .header("cf-ipcountry", "GB")
        .header("cf-ray", "8a1b2c3d4e5f6a7b-LHR")
        .header("referer", "https://example.com/")
        .send()
        .await
        .expect("server reachable");
    assert_eq!(res.status(), 200);
    let request_id = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert_eq!(res.text().await.unwrap(), "GET /hello\n");

    let captured = common::next_ingest(&mut rx).await;
    assert_eq!(captured.query["tag"], "server");

    let lines = &captured.batch.lines;
    let summary: Vec<_> = lines.iter().map(|l| (l.level, l.line.as_str())).collect();
    assert_eq!(
        summary,
        vec![
            (Level::Info, "GET /hello"),
            (Level::Debug, "Echo handler invoked"),
            (Level::Info, "Responded 200 OK"),
        ]
    );

    for line in lines {
        assert_eq!(line.app, "edge-test");
        assert_eq!(line.env, "ci");
        let meta = &line.meta;
        assert_eq!(meta["ip"], MetaValue::from("203.0.113.9"));
        assert_eq!(meta["countryCode"], MetaValue::from("GB"));
        assert_eq!(meta["colo"], MetaValue::from("LHR"));
        assert_eq!(meta["cfRay"], MetaValue::from("8a1b2c3d4e5f6a7b-LHR"));
        assert_eq!(meta["referer"], MetaValue::from("https://example.com/"));
        assert_eq!(meta["url"], MetaValue::from(format!("http://{addr}/hello?x=1")));
        assert_eq!(meta["handler"], MetaValue::from("echo"));
        assert_eq!(meta["status"], MetaValue::from(200));
        assert_eq!(meta["requestId"], MetaValue::from(request_id.as_str()));
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_server_error_logged_at_error_level() {
    let (endpoint, mut rx) = common::start_mock_ingest(StatusCode::OK).await;
    let (addr, shutdown, _updates, _server) = start_server(config(&endpoint)).await;

    let res = client()
        .get(format!("http://{addr}/status/503"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 503);

    let captured = common::next_ingest(&mut rx).await;
    let last = captured.batch.lines.last().unwrap();
    assert_eq!(last.level, Level::Error);
    assert_eq!(last.line, "Responded 503 Service Unavailable");
    assert_eq!(last.meta["requestedStatus"], MetaValue::from(503));
    assert!(!last.meta.contains_key("ip"));
    assert!(!last.meta.contains_key("countryCode"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_response_unaffected_by_ingest_failure() {
    let addr = common::closed_addr().await;
    let (server_addr, shutdown, _updates, _server) =
        start_server(config(&format!("http://{addr}/logs/ingest"))).await;

    let res = client()
        .get(format!("http://{server_addr}/healthz"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "ok");

    shutdown.trigger();
}

#[tokio::test]
async fn test_config_reload_applies_to_new_requests() {
    let (first_endpoint, mut first_rx) = common::start_mock_ingest(StatusCode::OK).await;
    let (second_endpoint, mut second_rx) = common::start_mock_ingest(StatusCode::OK).await;
    let (addr, shutdown, updates, _server) = start_server(config(&first_endpoint)).await;

    client().get(format!("http://{addr}/one")).send().await.unwrap();
    let captured = common::next_ingest(&mut first_rx).await;
    assert_eq!(captured.batch.lines[0].env, "ci");

    let mut reloaded = config(&second_endpoint);
    reloaded.logger.environment = Some("production".into());
    updates.send(reloaded).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    client().get(format!("http://{addr}/two")).send().await.unwrap();
    let captured = common::next_ingest(&mut second_rx).await;
    assert_eq!(captured.batch.lines[0].line, "GET /two");
    assert_eq!(captured.batch.lines[0].env, "production");

    shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_waits_for_pending_flush() {
    let (endpoint, mut rx) =
        common::start_slow_ingest(StatusCode::OK, Duration::from_millis(500)).await;
    let (addr, shutdown, _updates, server) = start_server(config(&endpoint)).await;

    let res = client().get(format!("http://{addr}/last")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server stops within the drain timeout")
        .unwrap();

    let captured = rx.try_recv().expect("flush delivered before the server returned");
    assert_eq!(captured.batch.lines[0].line, "GET /last");
}

#[tokio::test]
async fn test_shutdown_drain_is_bounded() {
    let (endpoint, _rx) = common::start_slow_ingest(StatusCode::OK, Duration::from_secs(30)).await;
    let mut config = config(&endpoint);
    config.server.flush_drain_timeout_secs = 1;
    let (addr, shutdown, _updates, server) = start_server(config).await;

    client().get(format!("http://{addr}/stuck")).send().await.unwrap();

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server gives up on the stuck flush")
        .unwrap();
}
