//! Per-request log accumulator.

use std::time::{Duration, Instant};
use axum::http::Request;

use crate::config::LoggerSettings;
use crate::ingest::{IngestBatch, IngestClient, LogLine, LogSink};
use crate::logger::defaults::DefaultLogData;
use crate::logger::entry::{epoch_millis, Level, LogEntry, Meta, MetaValue};
use crate::observability::metrics;

/// Meta key carrying the milliseconds between logger creation and flush.
pub const EXECUTION_TIME_KEY: &str = "executionTime";

/// Collects the log lines of one inbound request and ships them in a single
/// batch when the request is done.
///
/// Meta set through [`set_meta`](Self::set_meta) is bound when the batch is
/// built, so it applies to every line regardless of when it was logged.
#[derive(Debug)]
pub struct RequestLogger<S = IngestClient> {
    started_ms: u64,
    defaults: DefaultLogData,
    overrides: Meta,
    entries: Vec<LogEntry>,
    sink: S,
}

impl<S: LogSink> RequestLogger<S> {
    /// Start logging for `request`. Reads headers and edge metadata once; no I/O.
    pub fn new<B>(request: &Request<B>, settings: &LoggerSettings, sink: S) -> Self {
        Self {
            started_ms: epoch_millis(),
            defaults: DefaultLogData::from_request(request, settings),
            overrides: Meta::new(),
            entries: Vec::new(),
            sink,
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    pub fn log(&mut self, level: Level, message: impl Into<String>) {
        self.entries.push(LogEntry::new(level, message));
    }

    /// Set a meta value on every line of this request. Last write wins.
    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        self.overrides.insert(key.into(), value.into());
    }

    /// Recorded lines in call order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn defaults(&self) -> &DefaultLogData {
        &self.defaults
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unix time in milliseconds at which the logger was created.
    pub fn started_ms(&self) -> u64 {
        self.started_ms
    }

    /// Time since the logger was created.
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(epoch_millis().saturating_sub(self.started_ms))
    }

    /// Build the batch `flush` would send now.
    pub fn prepare_batch(&self) -> IngestBatch {
        self.batch_at(epoch_millis())
    }

    /// Build the batch as of `now_ms`.
    ///
    /// Each line's meta is the request defaults, then the current overrides,
    /// then `executionTime` (`now_ms` minus the creation time).
    pub fn batch_at(&self, now_ms: u64) -> IngestBatch {
        let execution_time = MetaValue::from(now_ms.saturating_sub(self.started_ms));

        let mut meta = self.defaults.meta.clone();
        meta.extend(self.overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        meta.insert(EXECUTION_TIME_KEY.to_string(), execution_time);

        let lines = self
            .entries
            .iter()
            .map(|entry| LogLine {
                line: entry.line.clone(),
                timestamp: entry.timestamp,
                level: entry.level,
                app: self.defaults.app.clone(),
                env: self.defaults.env.clone(),
                meta: meta.clone(),
            })
            .collect();

        IngestBatch { lines }
    }

    /// Send every recorded line in one batch. Best effort.
    ///
    /// Consumes the logger, so a request's lines are sent at most once.
    /// Delivery failures are written to the local diagnostic log and counted;
    /// they are never returned. A logger with no lines still sends an empty batch.
    pub async fn flush(self) {
        let now_ms = epoch_millis();
        let batch = self.batch_at(now_ms);
        let started = Instant::now();
        let result = self.sink.send(&batch, now_ms).await;
        metrics::record_flush(result.is_ok(), batch.len(), started);

        if let Err(e) = result {
            tracing::error!(
                error = %e,
                lines = batch.len(),
                url = ?self.defaults.meta.get("url"),
                "Failed to deliver request logs"
            );
        }
    }
}
