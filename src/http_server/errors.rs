//! # HTTP Errors
//!
//! Maps service outcomes and request rejections to status codes. Every error
//! body has the shape `{"detail": "..."}` and passes through credential
//! masking first.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::connection::mask_credentials;
use crate::records::ServiceError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP-facing errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed path, query string or body
    #[error("{0}")]
    InvalidRequest(String),

    /// Outcome of a record service call
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The blocking task running a service call panicked or was cancelled
    #[error("request worker failed: {0}")]
    Worker(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 422 Unprocessable Entity
            ApiError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Service(ServiceError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,

            // 404 / 409
            ApiError::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Service(ServiceError::Conflict(_)) => StatusCode::CONFLICT,

            // 500 Internal Server Error
            ApiError::Service(ServiceError::Connection(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Response detail with credentials masked
    pub fn detail(&self) -> String {
        mask_credentials(&self.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.detail();
        if status.is_server_error() {
            error!(status = status.as_u16(), %detail, "request failed");
        } else {
            warn!(status = status.as_u16(), %detail, "request rejected");
        }
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(ServiceError::validation("bad")).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(ServiceError::NotFound(1)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ServiceError::Conflict(1)).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(ServiceError::from(ConnectionError::NotConfigured)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_detail_masks_credentials() {
        let err = ApiError::from(ServiceError::from(ConnectionError::Open(
            "cannot connect with DSN=PROD;UID=ops;PWD=hunter2".into(),
        )));
        let detail = err.detail();
        assert!(!detail.contains("hunter2"));
        assert!(detail.contains("PWD=****"));
    }
}
