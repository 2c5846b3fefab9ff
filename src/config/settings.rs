//! Runtime settings handed to each [`RequestLogger`](crate::logger::RequestLogger).

use std::time::Duration;

use crate::config::schema::{IngestionConfig, LoggerConfig};

/// Environment name used when none is configured.
pub const UNKNOWN_ENV: &str = "unknown";

/// Immutable per-process settings shared by all request loggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerSettings {
    pub app_name: String,
    pub env: String,
    pub ingestion: IngestionSettings,
}

/// Where and how batches are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionSettings {
    pub endpoint: String,
    pub api_key: String,
    pub hostname: String,
    pub tag: String,
    pub timeout: Option<Duration>,
}

impl LoggerSettings {
    pub fn new(app_name: impl Into<String>, env: Option<String>, ingestion: IngestionSettings) -> Self {
        Self {
            app_name: app_name.into(),
            env: env
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| UNKNOWN_ENV.to_string()),
            ingestion,
        }
    }
}

impl From<&IngestionConfig> for IngestionSettings {
    fn from(config: &IngestionConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            hostname: config.hostname.clone(),
            tag: config.tag.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }
}

impl From<&LoggerConfig> for LoggerSettings {
    fn from(config: &LoggerConfig) -> Self {
        Self::new(
            config.logger.app_name.clone(),
            config.logger.environment.clone(),
            IngestionSettings::from(&config.ingestion),
        )
    }
}
