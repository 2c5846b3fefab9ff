//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::LoggerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides the ingestion key, which should not live in a config file.
pub const ENV_API_KEY: &str = "EDGE_LOGGER_API_KEY";
/// Overrides `logger.environment`.
pub const ENV_ENVIRONMENT: &str = "EDGE_LOGGER_ENV";
/// Overrides `logger.app_name`.
pub const ENV_APP_NAME: &str = "EDGE_LOGGER_APP_NAME";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, apply environment overrides, and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<LoggerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content, |name| std::env::var(name).ok())
}

/// Parse and validate configuration text, resolving overrides through `env`.
pub fn parse_config<F>(content: &str, env: F) -> Result<LoggerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: LoggerConfig = toml::from_str(content)?;
    apply_env_overrides(&mut config, env);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut LoggerConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |name: &str| env(name).filter(|v| !v.is_empty());

    if let Some(key) = lookup(ENV_API_KEY) {
        config.ingestion.api_key = key;
    }
    if let Some(environment) = lookup(ENV_ENVIRONMENT) {
        config.logger.environment = Some(environment);
    }
    if let Some(app_name) = lookup(ENV_APP_NAME) {
        config.logger.app_name = app_name;
    }
}
