//! Log levels, meta values and recorded entries.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Meta attached to a log line. Absent values are simply not present.
pub type Meta = BTreeMap<String, MetaValue>;

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Info,
    Debug,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level '{0}', expected info, debug or error")]
pub struct ParseLevelError(String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            "error" => Ok(Level::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// A meta value: text or integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Integer(i64),
    Text(String),
}

impl MetaValue {
    /// Integer if `raw` parses as one, text otherwise.
    pub fn parse_lossy(raw: &str) -> Self {
        raw.parse::<i64>()
            .map(MetaValue::Integer)
            .unwrap_or_else(|_| MetaValue::Text(raw.to_string()))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            MetaValue::Integer(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetaValue::Integer(n) => Some(*n),
            MetaValue::Text(_) => None,
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Text(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Text(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        MetaValue::Integer(value)
    }
}

impl From<i32> for MetaValue {
    fn from(value: i32) -> Self {
        MetaValue::Integer(value.into())
    }
}

impl From<u32> for MetaValue {
    fn from(value: u32) -> Self {
        MetaValue::Integer(value.into())
    }
}

impl From<u8> for MetaValue {
    fn from(value: u8) -> Self {
        MetaValue::Integer(value.into())
    }
}

impl From<u64> for MetaValue {
    /// Saturates at `i64::MAX`.
    fn from(value: u64) -> Self {
        MetaValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

/// A line as recorded during the request. App, env and meta are bound at flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub line: String,
    pub timestamp: u64,
    pub level: Level,
}

impl LogEntry {
    pub fn new(level: Level, line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            timestamp: epoch_millis(),
            level,
        }
    }
}

/// Milliseconds since the Unix epoch.
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}
