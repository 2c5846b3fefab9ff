//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the demonstration handlers
//! - Wire up middleware (tracing, request ID, request logging, timeout)
//! - Apply config reloads to the shared logger settings
//! - Serve until the shutdown signal, then drain pending log flushes

use axum::{
    extract::Path,
    http::{Method, StatusCode, Uri},
    middleware,
    routing::get,
    Extension, Router,
};
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tokio_util::task::TaskTracker;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{LoggerConfig, LoggerSettings};
use crate::http::handle::RequestLog;
use crate::http::middleware::{request_logging_middleware, LoggingState};
use crate::http::request::UuidRequestId;

/// Demonstration edge service: every request is logged and flushed.
pub struct EdgeServer {
    router: Router,
    settings: Arc<ArcSwap<LoggerSettings>>,
    flushes: TaskTracker,
    config: LoggerConfig,
}

impl EdgeServer {
    /// Create a new server with the given configuration.
    pub fn new(config: LoggerConfig) -> Self {
        let settings = Arc::new(ArcSwap::from_pointee(LoggerSettings::from(&config)));
        let flushes = TaskTracker::new();
        let state = LoggingState {
            settings: settings.clone(),
            client: reqwest::Client::new(),
            trust_edge_headers: config.server.trust_edge_headers,
            flushes: flushes.clone(),
        };

        let router = Self::build_router(&config, state);
        Self { router, settings, flushes, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &LoggerConfig, state: LoggingState) -> Router {
        Router::new()
            .route("/healthz", get(health_handler))
            .route("/status/{code}", get(status_handler))
            .fallback(echo_handler)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(middleware::from_fn_with_state(state, request_logging_middleware))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.server.request_timeout_secs,
                    ))),
            )
    }

    /// Run the server until `shutdown` fires, applying `config_updates` as they arrive.
    ///
    /// After the listener stops, waits up to `server.flush_drain_timeout_secs`
    /// for request logs still being delivered.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<LoggerConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            app = %self.config.logger.app_name,
            "HTTP server starting"
        );

        tokio::spawn(apply_config_updates(
            self.settings.clone(),
            config_updates,
            shutdown.resubscribe(),
        ));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        drain_flushes(
            &self.flushes,
            Duration::from_secs(self.config.server.flush_drain_timeout_secs),
        )
        .await;
        Ok(())
    }

    /// Settings handed to new request loggers.
    pub fn settings(&self) -> Arc<LoggerSettings> {
        self.settings.load_full()
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }
}

/// Wait for spawned flushes to finish, giving up after `limit`.
async fn drain_flushes(flushes: &TaskTracker, limit: Duration) {
    flushes.close();
    if flushes.is_empty() {
        return;
    }

    tracing::info!(pending = flushes.len(), "Waiting for pending log flushes");
    if tokio::time::timeout(limit, flushes.wait()).await.is_err() {
        tracing::warn!(
            abandoned = flushes.len(),
            timeout_secs = limit.as_secs(),
            "Pending log flushes abandoned at shutdown"
        );
    }
}

/// Swap in reloaded settings. In-flight requests keep the settings they started with.
async fn apply_config_updates(
    settings: Arc<ArcSwap<LoggerSettings>>,
    mut updates: mpsc::UnboundedReceiver<LoggerConfig>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(config) => {
                    let next = LoggerSettings::from(&config);
                    tracing::info!(
                        app = %next.app_name,
                        env = %next.env,
                        endpoint = %next.ingestion.endpoint,
                        "Logger settings reloaded"
                    );
                    settings.store(Arc::new(next));
                }
                None => break,
            },
            _ = shutdown.recv() => break,
        }
    }
}

async fn health_handler(Extension(log): Extension<RequestLog>) -> &'static str {
    log.debug("Health check");
    "ok"
}

/// Responds with the requested status; exercises error-level logging.
async fn status_handler(
    Extension(log): Extension<RequestLog>,
    Path(code): Path<u16>,
) -> StatusCode {
    log.set_meta("requestedStatus", u32::from(code));
    match StatusCode::from_u16(code) {
        Ok(status) => status,
        Err(_) => {
            log.error(format!("Invalid status code {code}"));
            StatusCode::BAD_REQUEST
        }
    }
}

async fn echo_handler(
    Extension(log): Extension<RequestLog>,
    method: Method,
    uri: Uri,
) -> String {
    log.debug("Echo handler invoked");
    log.set_meta("handler", "echo");
    format!("{method} {}\n", uri.path())
}
