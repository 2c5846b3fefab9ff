//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, env overrides)
//!     → validation.rs (semantic checks)
//!     → LoggerConfig (validated, immutable)
//!     → settings.rs (LoggerSettings, shared via Arc with every request logger)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of Arc<LoggerSettings>
//!     → requests started afterwards observe new settings
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - The ingestion key is expected from the environment
//! - A logger keeps the settings it was created with for its whole request

pub mod loader;
pub mod schema;
pub mod settings;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, IngestionConfig, LogFormat, LoggerConfig, ObservabilityConfig, ServerConfig};
pub use settings::{IngestionSettings, LoggerSettings};
pub use validation::ValidationError;
