//! Shared access to the logger of the current request.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::ingest::{IngestClient, LogSink};
use crate::logger::{Level, MetaValue, RequestLogger};

/// Cloneable handle to a request's logger, inserted into request extensions
/// so handlers can log and set meta.
///
/// Once the middleware takes the logger for flushing, further calls are
/// dropped.
pub struct RequestLog<S = IngestClient> {
    inner: Arc<Mutex<Option<RequestLogger<S>>>>,
}

impl<S> Clone for RequestLog<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: LogSink> RequestLog<S> {
    pub fn new(logger: RequestLogger<S>) -> Self {
        Self { inner: Arc::new(Mutex::new(Some(logger))) }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.with(|logger| logger.log(level, message));
    }

    pub fn set_meta(&self, key: impl Into<String>, value: impl Into<MetaValue>) {
        self.with(|logger| logger.set_meta(key, value));
    }

    /// Number of recorded lines, zero once taken.
    pub fn len(&self) -> usize {
        self.lock().as_ref().map_or(0, |logger| logger.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the logger out for flushing. Returns `None` if already taken.
    pub fn take(&self) -> Option<RequestLogger<S>> {
        self.lock().take()
    }

    fn with(&self, f: impl FnOnce(&mut RequestLogger<S>)) {
        match self.lock().as_mut() {
            Some(logger) => f(logger),
            None => tracing::debug!("Request logger already flushed, dropping call"),
        }
    }

    // A panic while holding the lock cannot leave the logger half-updated.
    fn lock(&self) -> MutexGuard<'_, Option<RequestLogger<S>>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
