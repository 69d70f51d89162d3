//! Error types for prefsync-core

use thiserror::Error;

/// Result type alias using prefsync-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in prefsync-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Key-value storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
