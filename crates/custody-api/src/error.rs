//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Ledger rejections keep their own machine-readable codes
//! (`AUTHORIZATION_ERROR`, `OWNERSHIP_ERROR`, `NOT_FOUND`, `INVALID_STATE`)
//! and carry the offending role, caller, or product in `details`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use custody_core::{CustodyError, ValidationError};

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "OWNERSHIP_ERROR", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Structured context for ledger rejections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// The ledger refused the operation.
    #[error(transparent)]
    Rejected(#[from] CustodyError),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Rejected(err) => {
                let status = match err {
                    CustodyError::Authorization { .. } | CustodyError::Ownership { .. } => {
                        StatusCode::FORBIDDEN
                    }
                    CustodyError::NotFound { .. } => StatusCode::NOT_FOUND,
                    CustodyError::InvalidState { .. } => StatusCode::CONFLICT,
                };
                (status, err.code())
            }
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        let Self::Rejected(err) = self else {
            return None;
        };
        Some(match err {
            CustodyError::Authorization { role, caller } => serde_json::json!({
                "role": role.as_str(),
                "caller": caller.as_str(),
            }),
            CustodyError::Ownership { product_id, caller } => serde_json::json!({
                "product_id": product_id.get(),
                "caller": caller.as_str(),
            }),
            CustodyError::NotFound { product_id } => serde_json::json!({
                "product_id": product_id.get(),
            }),
            CustodyError::InvalidState { product_id, status } => serde_json::json!({
                "product_id": product_id.get(),
                "status": status.ordinal(),
            }),
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        crate::middleware::metrics::record_rejection(&self);

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}
