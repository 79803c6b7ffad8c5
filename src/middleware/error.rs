//! Errors raised while configuring or compiling middleware.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MiddlewareError {
    #[error("Unknown middleware: {0}")]
    Unknown(String),

    #[error("Invalid arguments for middleware {middleware}: {reason}")]
    InvalidArguments { middleware: String, reason: String },

    #[error("Failed to build middleware {middleware}: {reason}")]
    Build { middleware: String, reason: String },
}

impl MiddlewareError {
    pub fn invalid_arguments(middleware: impl Into<String>, reason: impl Into<String>) -> Self {
        MiddlewareError::InvalidArguments {
            middleware: middleware.into(),
            reason: reason.into(),
        }
    }
}
