//! API error types and JSON error response formatting.
//!
//! ApiError provides a consistent JSON error response format across all
//! endpoints, mapping internal errors to appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use pictag_core::error::PictagError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "not_found").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid parameters.
    BadRequest(String),
    /// 404 Not Found - resource does not exist.
    NotFound(String),
    /// 500 Internal Server Error - unexpected server error.
    Internal(String),
    /// 503 Service Unavailable - the AI backend did not deliver.
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<PictagError> for ApiError {
    fn from(err: PictagError) -> Self {
        match &err {
            PictagError::EmptyFile | PictagError::MissingName => {
                ApiError::BadRequest(err.to_string())
            }
            PictagError::Backend(_) | PictagError::EmptyResponse => {
                ApiError::ServiceUnavailable(err.to_string())
            }
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_bad_requests() {
        assert!(matches!(
            ApiError::from(PictagError::EmptyFile),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(PictagError::MissingName),
            ApiError::BadRequest(_)
        ));
    }

    #[test]
    fn test_backend_errors_are_service_unavailable() {
        assert!(matches!(
            ApiError::from(PictagError::Backend("down".into())),
            ApiError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            ApiError::from(PictagError::EmptyResponse),
            ApiError::ServiceUnavailable(_)
        ));
    }

    #[test]
    fn test_store_errors_are_internal() {
        assert!(matches!(
            ApiError::from(PictagError::Store("disk".into())),
            ApiError::Internal(_)
        ));
        assert!(matches!(
            ApiError::from(PictagError::Persist("db".into())),
            ApiError::Internal(_)
        ));
    }
}
