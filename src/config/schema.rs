//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the logger and
//! its demonstration server. All types derive Serde traits for deserialization
//! from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LoggerConfig {
    /// Static identity attached to every log line.
    pub logger: AppConfig,

    /// Remote ingestion endpoint settings.
    pub ingestion: IngestionConfig,

    /// Demonstration edge handler settings.
    pub server: ServerConfig,

    /// Local diagnostics and metrics.
    pub observability: ObservabilityConfig,
}

/// Application identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application name sent as `app` on every line.
    pub app_name: String,

    /// Deployment environment. Sent as `"unknown"` when unset.
    pub environment: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "edge-request-logger".to_string(),
            environment: None,
        }
    }
}

/// Ingestion endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Full ingestion URL without query string.
    pub endpoint: String,

    /// Value of the `apikey` header.
    pub api_key: String,

    /// `hostname` query parameter.
    pub hostname: String,

    /// `tag` query parameter.
    pub tag: String,

    /// Per-request timeout in seconds. `None` leaves the transport default.
    pub timeout_secs: Option<u64>,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://logs.logdna.com/logs/ingest".to_string(),
            // WARNING: This is a placeholder! Set EDGE_LOGGER_API_KEY in production.
            api_key: String::new(),
            hostname: "example.net".to_string(),
            tag: "edge".to_string(),
            timeout_secs: None,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Derive edge metadata from `cf-*` / `x-edge-*` request headers.
    pub trust_edge_headers: bool,

    /// How long shutdown waits for pending log flushes, in seconds.
    pub flush_drain_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            trust_edge_headers: true,
            flush_drain_timeout_secs: 5,
        }
    }
}

/// Output format of the local diagnostic log.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Diagnostic log format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: LoggerConfig = toml::from_str("").unwrap();
        assert_eq!(config.logger.app_name, "edge-request-logger");
        assert!(config.logger.environment.is_none());
        assert_eq!(config.ingestion.endpoint, "https://logs.logdna.com/logs/ingest");
        assert!(config.ingestion.timeout_secs.is_none());
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_sections() {
        let config: LoggerConfig = toml::from_str(
            r#"
            [logger]
            environment = "production"

            [ingestion]
            tag = "api"
            timeout_secs = 3

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.logger.app_name, "edge-request-logger");
        assert_eq!(config.logger.environment.as_deref(), Some("production"));
        assert_eq!(config.ingestion.tag, "api");
        assert_eq!(config.ingestion.hostname, "example.net");
        assert_eq!(config.ingestion.timeout_secs, Some(3));
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }
}
