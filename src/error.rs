//! Error handling module
//!
//! Provides unified error types and handling for the entire application.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Tenant mismatch: {0}")]
    TenantMismatch(String),

    #[error("Mission expired: {0}")]
    MissionExpired(String),

    #[error("Mission closed: {0}")]
    MissionClosed(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Incomplete triage: {pending_count} record(s) still awaiting a decision")]
    IncompleteTriage { pending_count: usize },

    #[error("Injection failed: {0}")]
    InjectionFailed(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match &self {
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
                None,
            ),
            AppError::TenantMismatch(msg) => (
                StatusCode::FORBIDDEN,
                "TENANT_MISMATCH",
                msg.clone(),
                None,
            ),
            AppError::MissionExpired(msg) => (
                StatusCode::GONE,
                "MISSION_EXPIRED",
                msg.clone(),
                None,
            ),
            AppError::MissionClosed(msg) => (
                StatusCode::CONFLICT,
                "MISSION_CLOSED",
                msg.clone(),
                None,
            ),
            AppError::InvalidTransition(msg) => (
                StatusCode::CONFLICT,
                "INVALID_TRANSITION",
                msg.clone(),
                None,
            ),
            AppError::IncompleteTriage { pending_count } => (
                StatusCode::CONFLICT,
                "INCOMPLETE_TRIAGE",
                format!(
                    "Cannot legalize: {} record(s) still awaiting a triage decision",
                    pending_count
                ),
                Some(format!("pendingCount={}", pending_count)),
            ),
            AppError::InjectionFailed(msg) => {
                error!("Injection batch rejected: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "INJECTION_FAILED",
                    "Batch commit was rejected; no records were promoted. Safe to retry.".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                msg.clone(),
                None,
            ),
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            error: details,
            code: Some(error_code.to_string()),
        });

        (status, body).into_response()
    }
}

/// Wrapper for errors surfaced to unauthenticated public callers.
///
/// Every submit failure produces the same generic body, whatever the
/// underlying cause; the specific taxonomy entry is only logged.
#[derive(Debug)]
pub struct PublicError(pub AppError);

impl From<AppError> for PublicError {
    fn from(err: AppError) -> Self {
        PublicError(err)
    }
}

impl IntoResponse for PublicError {
    fn into_response(self) -> Response {
        warn!("Public submission rejected: {}", self.0);

        let body = Json(ErrorResponse {
            success: false,
            message: "Your registration could not be processed. Please verify your link and try again."
                .to_string(),
            error: None,
            code: Some("SUBMISSION_FAILED".to_string()),
        });

        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper function to create a validation error
pub fn validation_error(msg: impl Into<String>) -> AppError {
    AppError::Validation(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_triage_message() {
        let err = AppError::IncompleteTriage { pending_count: 3 };
        assert_eq!(
            err.to_string(),
            "Incomplete triage: 3 record(s) still awaiting a decision"
        );
    }

    #[test]
    fn test_helper_constructors() {
        assert!(matches!(validation_error("x"), AppError::Validation(_)));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::TenantMismatch("x".into()), StatusCode::FORBIDDEN),
            (AppError::MissionExpired("x".into()), StatusCode::GONE),
            (AppError::MissionClosed("x".into()), StatusCode::CONFLICT),
            (AppError::InvalidTransition("x".into()), StatusCode::CONFLICT),
            (
                AppError::IncompleteTriage { pending_count: 2 },
                StatusCode::CONFLICT,
            ),
            (
                AppError::InjectionFailed("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
