//! Observability of the logger itself.
//!
//! # Data Flow
//! ```text
//! Request loggers and the server produce:
//!     → logging.rs (tracing events: startup, reloads, delivery failures)
//!     → metrics.rs (flush outcomes, lines, delivery latency)
//! ```
//!
//! # Design Decisions
//! - Delivery failures are only visible here, never to request handlers
//! - Metrics are cheap and disabled unless an exporter is installed

pub mod logging;
pub mod metrics;
