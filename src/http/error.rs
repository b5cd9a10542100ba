//! Mapping from crate errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::error::{ConversationError, Error, StorageError};

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Error::Conversation(ConversationError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "MESSAGE_NOT_FOUND")
            }
            Error::Conversation(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INVALID_CONVERSATION"),
            Error::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Error::Storage(StorageError::Corrupt { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_CORRUPT")
            }
            // The change is applied in memory but was not written.
            Error::Storage(StorageError::Write { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_WRITE_FAILED")
            }
            Error::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            Error::Export(_) => (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_FAILED"),
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
        };

        if status.is_server_error() {
            error!(code, error = %self, "Request failed");
        }

        (
            status,
            Json(json!({
                "error": {
                    "code": code,
                    "message": self.to_string(),
                }
            })),
        )
            .into_response()
    }
}
