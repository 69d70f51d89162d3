use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] prefsync_core::Error),
    #[error(transparent)]
    Api(#[from] prefsync_core::api::ApiError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No preference text provided")]
    EmptyText,
    #[error("Preference ID cannot be empty")]
    EmptyPreferenceId,
    #[error("Search query cannot be empty")]
    EmptySearchQuery,
    #[error("Metadata must be a JSON object: {0}")]
    InvalidMetadata(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Request failed: {0}")]
    OperationFailed(String),
    #[error(
        "Backend is not configured. Run `prefsync config init --api-base-url <URL>` or set PREFSYNC_API_BASE_URL."
    )]
    NotConfigured,
}
