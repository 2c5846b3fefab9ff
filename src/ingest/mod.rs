//! Outbound delivery to the log ingestion API.
//!
//! # Data Flow
//! ```text
//! RequestLogger::flush
//!     → batch.rs (IngestBatch { lines })
//!     → client.rs (LogSink::send → POST <endpoint>?tag=&hostname=&now=)
//!     → Ok / IngestError (logged by the caller, never propagated)
//! ```

pub mod batch;
pub mod client;

pub use batch::{IngestBatch, LogLine};
pub use client::{IngestClient, IngestError, LogSink, API_KEY_HEADER, JSON_UTF8};
