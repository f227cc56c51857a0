//! Error handling for the shelfsync client

use reqwest::StatusCode;
use shelfsync_state::StateError;
use thiserror::Error;

/// Unified error type for the shelfsync client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Error responses from the catalog server
    #[error("API error: {message} (Status: {status})")]
    Api { status: StatusCode, message: String },

    /// Errors from the page state synchronizer
    #[error("State error: {0}")]
    State(#[from] StateError),
}

impl Error {
    /// Create a new API error from a status code and message
    pub fn api(status: StatusCode, message: impl Into<String>) -> Self {
        Error::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether this error is the server's 404 response
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Result alias used across the client
pub type Result<T> = std::result::Result<T, Error>;
