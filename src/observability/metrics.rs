//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_logger_flushes_total` (counter): flush attempts by outcome (`delivered`, `failed`)
//! - `edge_logger_lines_total` (counter): lines handed to the ingestion endpoint
//! - `edge_logger_flush_duration_seconds` (histogram): time spent in one delivery attempt
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record the outcome of one flush.
pub fn record_flush(delivered: bool, lines: usize, started: Instant) {
    let outcome = if delivered { "delivered" } else { "failed" };
    counter!("edge_logger_flushes_total", "outcome" => outcome).increment(1);
    counter!("edge_logger_lines_total").increment(lines as u64);
    histogram!("edge_logger_flush_duration_seconds").record(started.elapsed().as_secs_f64());
}
