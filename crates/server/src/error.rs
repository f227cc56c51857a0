//! API error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shelfsync_models::ErrorResponse;
use thiserror::Error;
use tracing::error;

/// Errors that can occur while serving requests
///
/// Every variant renders as a JSON body of the form `{"error": "..."}`.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Not found")]
    NotFound,

    #[error("Invalid page id: {0}")]
    InvalidPageId(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Git {command} failed: {detail}")]
    Git { command: String, detail: String },
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::InvalidPageId(_) => StatusCode::BAD_REQUEST,
            ServerError::Io(_) | ServerError::Json(_) | ServerError::Git { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
