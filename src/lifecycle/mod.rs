//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! signals.rs: SIGTERM/SIGINT → Shutdown::trigger
//! shutdown.rs: broadcast → server stops accepting, reload task exits
//! ```
//!
//! Flushes already spawned when shutdown begins are not awaited.

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
