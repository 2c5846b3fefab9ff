//! Per-request logging.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → defaults.rs (ua, referer, ip, edge geo/ASN/TLS, url, method, ...)
//!     → RequestLogger::info / debug / error   (entries, call order)
//!     → RequestLogger::set_meta               (overrides, last write wins)
//!     → RequestLogger::flush                  (merge + executionTime → one batch)
//!     → ingest::LogSink
//! ```
//!
//! # Design Decisions
//! - Nothing here can fail except delivery, and delivery failures stay local
//! - Overrides are merged when the batch is built, not when a line is logged
//! - `flush` takes `self`: a logger cannot send twice

pub mod defaults;
pub mod entry;
pub mod request_logger;

pub use defaults::{DefaultLogData, DEFAULT_FORWARDED_FOR, DEFAULT_REFERER};
pub use entry::{epoch_millis, Level, LogEntry, Meta, MetaValue, ParseLevelError};
pub use request_logger::{RequestLogger, EXECUTION_TIME_KEY};
