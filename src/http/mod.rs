//! Demonstration edge handler.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace + request id layers)
//!     → middleware.rs (edge metadata, RequestLogger per request)
//!     → handlers log through handle.rs (RequestLog extension)
//!     → middleware.rs logs the status and spawns the flush
//!     → Send response to client
//! ```

pub mod handle;
pub mod middleware;
pub mod request;
pub mod server;

pub use handle::RequestLog;
pub use middleware::{request_logging_middleware, LoggingState};
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::EdgeServer;
