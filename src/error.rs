//! Error types for the admission boundary.
//!
//! Policy rejections are [`FieldError`](crate::webhooks::policies::FieldError)s
//! and never surface here. These errors cover configuration and malformed
//! admission requests.

use thiserror::Error;

/// Error type for admission operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid or missing configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Admission request is missing data required for validation
    #[error("Invalid admission request: {0}")]
    InvalidRequest(String),
}

/// Result type alias for admission operations
pub type Result<T> = std::result::Result<T, Error>;
