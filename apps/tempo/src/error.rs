//! # Shell Errors
//!
//! Failures of the service shell itself: loading configuration, binding
//! the listener, serving. Request-level failures from the core travel as
//! [`crate::api::ApiError`] instead.

use thiserror::Error;

/// Errors raised outside request handling.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be parsed or rendered.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a file or serving on a socket failed.
    #[error("I/O error: {0}")]
    Io(String),
}
