//! Common error types for xmlup

use thiserror::Error;

/// Common result type for xmlup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised outside the correction itself (configuration, file access)
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input that never reached the correction step
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
