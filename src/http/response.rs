//! Response handling and error mapping.
//!
//! # Responsibilities
//! - Map view-set failures to HTTP status codes
//! - Render every error as a JSON `{"detail": ...}` body
//!
//! # Design Decisions
//! - One error type for all resource handlers
//! - Validation failures are 400, unknown records 404, anything else 500
//! - Bodies axum refuses before parsing keep axum's status

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    /// Body parsed but failed field validation.
    #[error("{0}")]
    Validation(String),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// Body refused before parsing (content type, size).
    #[error("{1}")]
    Rejected(StatusCode, String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Rejected(status, _) => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = %status, error = %self, "Request rejected");
        (
            status,
            Json(ErrorBody {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
