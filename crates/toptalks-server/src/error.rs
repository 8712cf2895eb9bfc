//! HTTP error types for the Top Talks server.
//!
//! Maps domain errors from `toptalks-core` into HTTP responses. Every variant
//! produces a JSON body with a machine-readable `error` field and a
//! human-readable `message`; validation failures add per-field `errors`.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use toptalks_core::error::{ShellError, ValidationErrors};

/// Application-level error returned from HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// The submission failed validation.
    Validation(ValidationErrors),
    /// The request body could not be decoded.
    BadRequest(String),
    /// The request body exceeds the configured limit.
    PayloadTooLarge(String),
    /// The request body has a content type the endpoint does not accept.
    UnsupportedMediaType(String),
    /// Requested resource not found.
    NotFound(String),
    /// Internal server error.
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<BTreeMap<&'static str, Vec<String>>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message, errors) = match self {
            Self::Validation(rejected) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                rejected.summary(),
                Some(rejected.by_field()),
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            Self::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                msg,
                None,
            ),
            Self::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "unsupported_media_type",
                msg,
                None,
            ),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            Self::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg,
                None,
            ),
        };

        let body = ErrorBody {
            error: error_type,
            message,
            errors,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        Self::Validation(err)
    }
}

impl From<ShellError> for AppError {
    fn from(err: ShellError) -> Self {
        match err {
            ShellError::MissingEntry { .. } => Self::NotFound(err.to_string()),
            ShellError::Read { .. } | ShellError::Parse { .. } | ShellError::Encode { .. } => {
                Self::Internal(err.to_string())
            }
        }
    }
}
