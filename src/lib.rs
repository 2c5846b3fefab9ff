//! Per-request log accumulation for edge HTTP handlers.
//!
//! A [`RequestLogger`] is created when a request arrives, collects log lines
//! enriched with request and edge metadata while the request is handled, and
//! ships them to a log ingestion API in a single batch when the request ends.

pub mod config;
pub mod edge;
pub mod http;
pub mod ingest;
pub mod lifecycle;
pub mod logger;
pub mod observability;

pub use config::{LoggerConfig, LoggerSettings};
pub use edge::EdgeMetadata;
pub use http::EdgeServer;
pub use ingest::{IngestBatch, IngestClient, IngestError, LogSink};
pub use lifecycle::Shutdown;
pub use logger::{Level, MetaValue, RequestLogger};
