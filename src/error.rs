//! Error types for Rally API operations.

use thiserror::Error;

/// Errors that can occur during Rally API operations.
#[derive(Debug, Error)]
pub enum RallyError {
    /// Configuration is missing or incomplete.
    #[error("Rally configuration required: {0}")]
    ConfigMissing(String),

    /// The request could not be built from the given arguments.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The service rejected the supplied credentials.
    #[error("Rally rejected the credentials (HTTP {status_code})")]
    Auth { status_code: u16 },

    /// API request failed with a non-success status.
    #[error("Rally API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// The response body is not valid JSON.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The parsed document does not have the expected shape, or pagination
    /// stopped making progress.
    #[error("Unexpected response: {0}")]
    Protocol(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl RallyError {
    /// Returns true for failures raised while talking to the service
    /// (connection errors and non-success statuses other than auth).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            RallyError::Http(_) | RallyError::Api { .. } | RallyError::RateLimited { .. }
        )
    }
}

/// Result type alias for Rally operations.
pub type Result<T> = core::result::Result<T, RallyError>;
