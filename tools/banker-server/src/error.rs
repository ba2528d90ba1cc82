//! API error responses
//!
//! Validation failures and undecodable requests never share a shape with
//! a computed outcome: both carry an `error` code instead of `safe`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use banker_core::ValidationError;
use serde::Serialize;
use std::fmt;
use tokio::task::JoinError;
use tracing::{error, warn};

/// Errors returned by the API
#[derive(Debug)]
pub enum ApiError {
    /// The snapshot decoded but failed validation
    Validation(ValidationError),

    /// The body could not be decoded into a snapshot
    MalformedRequest { status: StatusCode, message: String },

    /// The check did not run to completion (panicked or was cancelled)
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MalformedRequest { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(e) => e.code(),
            ApiError::MalformedRequest { status, .. } => match *status {
                StatusCode::PAYLOAD_TOO_LARGE => "payload_too_large",
                StatusCode::UNSUPPORTED_MEDIA_TYPE => "unsupported_media_type",
                _ => "malformed_request",
            },
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::MalformedRequest { message, .. } => write!(f, "{}", message),
            ApiError::Internal(message) => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e)
    }
}

impl From<JoinError> for ApiError {
    fn from(e: JoinError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection.status() {
            // Type errors inside the body (e.g. 1.5 where an integer belongs)
            // are malformed requests, not validation failures
            StatusCode::UNPROCESSABLE_ENTITY => StatusCode::BAD_REQUEST,
            other => other,
        };
        ApiError::MalformedRequest {
            status,
            message: rejection.body_text(),
        }
    }
}

#[derive(Serialize)]
struct ValidationBody {
    error: &'static str,
    message: String,
    matrix: &'static str,
    row: Option<usize>,
    column: Option<usize>,
}

#[derive(Serialize)]
struct MessageBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let self_message = self.to_string();
        if status.is_server_error() {
            error!(status = status.as_u16(), code, "request failed: {}", self_message);
        } else {
            warn!(status = status.as_u16(), code, "request rejected: {}", self_message);
        }

        match self {
            ApiError::Validation(e) => (
                status,
                Json(ValidationBody {
                    error: code,
                    message: e.to_string(),
                    matrix: e.matrix().as_str(),
                    row: e.row(),
                    column: e.column(),
                }),
            )
                .into_response(),
            ApiError::MalformedRequest { message, .. } => (
                status,
                Json(MessageBody {
                    error: code,
                    message,
                }),
            )
                .into_response(),
            ApiError::Internal(_) => (
                status,
                Json(MessageBody {
                    error: code,
                    message: self_message,
                }),
            )
                .into_response(),
        }
    }
}
