//! Wire payload accepted by the ingestion endpoint.

use serde::{Deserialize, Serialize};

use crate::logger::{Level, Meta};

/// Body of one ingestion POST: `{"lines": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IngestBatch {
    pub lines: Vec<LogLine>,
}

/// A fully merged log line as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub line: String,
    /// Epoch milliseconds at which the line was recorded.
    pub timestamp: u64,
    pub level: Level,
    pub app: String,
    pub env: String,
    pub meta: Meta,
}

impl IngestBatch {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
