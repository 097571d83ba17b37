//! Common error types for SMT

use thiserror::Error;

/// Common result type for SMT operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the tracker
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Uploaded tabular data could not be parsed
    #[error("Malformed input: {0}")]
    MalformedCsv(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Caller is not permitted to touch the requested location
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
