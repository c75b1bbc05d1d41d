//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use jboard_storage::StorageError;
use jboard_store::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Catch-all message for server-side failures; internal detail never
/// reaches clients.
const INTERNAL_MSG: &str = "Something went wrong, please try again later.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(e) if e.is_duplicate() => StatusCode::BAD_REQUEST,
            ApiError::Store(e) if e.is_invalid_id() => StatusCode::NOT_FOUND,
            ApiError::Storage(e) if e.is_client_fault() => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) | ApiError::Store(_) | ApiError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message for the `{"msg": ...}` body.
    fn message(&self) -> String {
        match self {
            // Duplicate-key and invalid-id carry their own client text.
            ApiError::Store(e) if e.is_duplicate() || e.is_invalid_id() => e.to_string(),
            ApiError::Storage(e) if e.is_client_fault() => {
                "Resume upload failed".to_string()
            }
            ApiError::Internal(_) | ApiError::Store(_) | ApiError::Storage(_) => {
                INTERNAL_MSG.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {field}"))
                })
            })
            .collect();
        messages.sort();
        ApiError::Validation(messages.join(", "))
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    msg: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            msg: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_is_bad_request_with_field_message() {
        let err = ApiError::from(StoreError::Duplicate {
            field: "email".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message(),
            "Duplicate value for field: email. Please use another value."
        );
    }

    #[test]
    fn invalid_id_is_not_found() {
        let err = ApiError::from(StoreError::InvalidId("xyz".to_string()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "No item found with id: xyz");
    }

    #[test]
    fn internal_detail_does_not_leak() {
        let err = ApiError::internal("connection pool exhausted");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), INTERNAL_MSG);
    }

    #[test]
    fn bad_resume_is_bad_request() {
        let err = ApiError::from(StorageError::UnsupportedFileType("cv.exe".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Resume upload failed");
    }

    #[test]
    fn storage_backend_failure_is_internal() {
        let err = ApiError::from(StorageError::upload_failed("timeout"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), INTERNAL_MSG);
    }

    #[test]
    fn role_mismatch_message() {
        let err = ApiError::unauthorized("Not authorized to access this route");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Not authorized to access this route");
    }
}
