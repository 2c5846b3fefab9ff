//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All errors are collected
//! so a broken config file is reported in one pass.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::LoggerConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("logger.app_name must not be empty")]
    EmptyAppName,

    #[error("ingestion.endpoint '{0}' is not a valid http(s) URL")]
    InvalidEndpoint(String),

    #[error("ingestion.api_key must not be empty")]
    MissingApiKey,

    #[error("ingestion.{0} must not be empty")]
    EmptyField(&'static str),

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &LoggerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.logger.app_name.trim().is_empty() {
        errors.push(ValidationError::EmptyAppName);
    }

    let ingestion = &config.ingestion;
    match Url::parse(&ingestion.endpoint) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidEndpoint(ingestion.endpoint.clone())),
    }
    if ingestion.api_key.is_empty() {
        errors.push(ValidationError::MissingApiKey);
    }
    if ingestion.hostname.is_empty() {
        errors.push(ValidationError::EmptyField("hostname"));
    }
    if ingestion.tag.is_empty() {
        errors.push(ValidationError::EmptyField("tag"));
    }
    if ingestion.timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout("ingestion.timeout_secs"));
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("server.request_timeout_secs"));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> LoggerConfig {
        let mut config = LoggerConfig::default();
        config.ingestion.api_key = "key".into();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_default_config_requires_api_key() {
        let errors = validate_config(&LoggerConfig::default()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingApiKey]);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid();
        config.logger.app_name = "  ".into();
        config.ingestion.endpoint = "ftp://logs.example.com".into();
        config.ingestion.tag = String::new();
        config.ingestion.timeout_secs = Some(0);
        config.server.bind_address = "not-an-addr".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::EmptyAppName));
        assert!(errors.contains(&ValidationError::EmptyField("tag")));
        assert!(errors.contains(&ValidationError::ZeroTimeout("ingestion.timeout_secs")));
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = valid();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("observability.metrics_address"));
    }
}
