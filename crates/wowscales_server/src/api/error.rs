//! API error response types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use wowscales_core::VerificationServiceError;

pub const NOT_FOUND_MESSAGE: &str = "Verification not found";
pub const LIST_FAILED_MESSAGE: &str = "Failed to fetch verifications";
pub const GET_FAILED_MESSAGE: &str = "Failed to fetch verification";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save verification";

/// API error response body
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

/// Errors surfaced to HTTP clients.
///
/// Internal details stay in the logs; the body carries a fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    NotFound,
    Internal(&'static str),
}

impl ApiError {
    /// Maps a service error, using `failure_message` for anything that is
    /// not a missing record.
    pub fn from_service(err: &VerificationServiceError, failure_message: &'static str) -> Self {
        match err {
            VerificationServiceError::NotFound(_) => Self::NotFound,
            VerificationServiceError::MalformedInput(_)
            | VerificationServiceError::WriteFailure(_)
            | VerificationServiceError::ReadFailure(_) => Self::Internal(failure_message),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::NotFound => NOT_FOUND_MESSAGE,
            Self::Internal(message) => message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message().to_string(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}
