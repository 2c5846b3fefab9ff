//! Request logging middleware.
//! Owns one `RequestLogger` per request and flushes it after the response.

use std::sync::Arc;
use arc_swap::ArcSwap;
use tokio_util::task::TaskTracker;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::config::LoggerSettings;
use crate::edge::EdgeMetadata;
use crate::http::handle::RequestLog;
use crate::http::request::request_id;
use crate::ingest::IngestClient;
use crate::logger::RequestLogger;

/// State required by the logging middleware.
#[derive(Clone)]
pub struct LoggingState {
    /// Current settings; swapped on config reload.
    pub settings: Arc<ArcSwap<LoggerSettings>>,
    /// Shared connection pool for ingestion calls.
    pub client: reqwest::Client,
    /// Derive [`EdgeMetadata`] from forwarded edge headers.
    pub trust_edge_headers: bool,
    /// Pending flushes, drained on shutdown.
    pub flushes: TaskTracker,
}

pub async fn request_logging_middleware(
    State(state): State<LoggingState>,
    mut request: Request,
    next: Next,
) -> Response {
    // 1. Edge metadata, unless an outer layer already attached it
    if state.trust_edge_headers && request.extensions().get::<EdgeMetadata>().is_none() {
        let edge = EdgeMetadata::from_headers(request.headers());
        request.extensions_mut().insert(edge);
    }

    // 2. One logger per request, bound to the settings current at arrival
    let settings = state.settings.load_full();
    let sink = IngestClient::with_client(state.client.clone(), settings.ingestion.clone());
    let mut logger = RequestLogger::new(&request, &settings, sink);
    logger.info(format!("{} {}", request.method(), request.uri().path()));
    if let Some(id) = request_id(&request) {
        logger.set_meta("requestId", id);
    }

    let log = RequestLog::new(logger);
    request.extensions_mut().insert(log.clone());

    // 3. Handle
    let response = next.run(request).await;

    // 4. Outcome
    let status = response.status();
    log.set_meta("status", u32::from(status.as_u16()));
    if status.is_server_error() {
        log.error(format!("Responded {status}"));
    } else {
        log.info(format!("Responded {status}"));
    }

    // 5. Deliver off the response path
    if let Some(logger) = log.take() {
        state.flushes.spawn(logger.flush());
    }

    response
}
