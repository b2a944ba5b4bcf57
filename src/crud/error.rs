//! Handler errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::http::response::MessageResponse;
use crate::store::StoreError;

/// Result type for CRUD handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing. The message is returned to the client.
    #[error("{0}")]
    Validation(&'static str),

    /// The request body could not be parsed.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The request body is over the configured limit.
    #[error("request body too large")]
    BodyTooLarge,

    /// The storage driver failed. Never shown to the client.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            ApiError::Validation(message) => *message,
            ApiError::InvalidBody(_) => "Invalid request body.",
            ApiError::BodyTooLarge => "Request body too large.",
            ApiError::Storage(_) => "Internal server error.",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Storage(err) => tracing::error!(error = %err, "Storage operation failed"),
            ApiError::InvalidBody(detail) => tracing::debug!(detail = %detail, "Rejected request body"),
            ApiError::Validation(reason) => tracing::debug!(reason = %reason, "Validation failed"),
            ApiError::BodyTooLarge => tracing::debug!("Rejected oversized request body"),
        }

        let body = Json(MessageResponse::new(self.public_message()));
        (self.status_code(), body).into_response()
    }
}
