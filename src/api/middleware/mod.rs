//! Middleware components for request processing.
//!
//! This module contains middleware for logging, request ID tracking,
//! and error handling.

mod error_handler;
mod logging;
mod request_id;

pub use error_handler::error_correlation_middleware;
pub use logging::logging_middleware;
pub use request_id::{RequestId, request_id_middleware};
