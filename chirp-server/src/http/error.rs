//! API error type with IntoResponse
//!
//! Every failure leaves as `{"result": false, "error_type", "error_messages"}`
//! with a status derived from the domain error.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::models::ValidationError;
use crate::Error;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Missing or unknown api-key (401)
    Unauthorized,

    /// Missing row, or a reference to one (404)
    NotFound(String),

    /// Duplicate row (422)
    AlreadyExists(String),

    /// Malformed input (422)
    Validation(String),

    /// Anything else (500, logged)
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyExists(_) | Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::AlreadyExists(_) => "already_exists",
            Self::Validation(_) => "validation_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_type = self.error_type();
        let message = match self {
            Self::Unauthorized => crate::error::messages::UNAUTHORIZED.to_string(),
            Self::NotFound(m) | Self::AlreadyExists(m) | Self::Validation(m) => m,
            Self::Internal(m) => {
                // Log the actual error, return generic message
                tracing::error!("Internal error: {}", m);
                "an internal error occurred".to_string()
            }
        };

        let body = json!({
            "result": false,
            "error_type": error_type,
            "error_messages": message,
        });
        (status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::Unauthorized => Self::Unauthorized,
            Error::NotFound(m) | Error::ReferencedNotFound(m) => Self::NotFound(m),
            Error::AlreadyExists(m) => Self::AlreadyExists(m),
            Error::Validation(v) => Self::Validation(v.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::Validation(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::Validation(e.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        Self::Validation(e.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        Self::Validation(e.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self::Validation(e.body_text())
    }
}
