//! # REST Errors
//!
//! HTTP mapping of application errors.
//!
//! | Application error | Status | Code |
//! |---|---|---|
//! | validation, malformed input | 400 | `VALIDATION_ERROR` |
//! | caller does not own the resource | 403 | `FORBIDDEN` |
//! | unknown resource or recipient | 404 | `NOT_FOUND` |
//! | duplicate or concurrent update | 409 | `CONFLICT` |
//! | business rule violation | 422 | `BUSINESS_RULE_VIOLATION` |
//! | anything else | 500 | `INTERNAL_ERROR` |

use crate::application::error::ApplicationError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Error returned by REST handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or invalid input.
    #[error("{0}")]
    BadRequest(String),

    /// Caller may not act on the resource.
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate or stale write.
    #[error("{0}")]
    Conflict(String),

    /// A business rule rejected the request.
    #[error("{0}")]
    BusinessRule(String),

    /// Unexpected failure.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BusinessRule(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "VALIDATION_ERROR",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        let message = err.to_string();
        if err.is_not_found() {
            return Self::NotFound(message);
        }
        if err.is_validation() {
            return Self::BadRequest(message);
        }
        match &err {
            ApplicationError::Forbidden(_) => Self::Forbidden(message),
            ApplicationError::Repository(e) if e.is_duplicate() || e.is_version_conflict() => {
                Self::Conflict(message)
            }
            ApplicationError::Domain(_) | ApplicationError::PaymentNotConfirmed { .. } => {
                Self::BusinessRule(message)
            }
            _ => {
                error!(error = %err, "request failed");
                Self::Internal(message)
            }
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable code.
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Result type for REST handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use crate::infrastructure::persistence::RepositoryError;

    #[test]
    fn not_found_maps_to_404() {
        let err: ApiError = ApplicationError::not_found("Share", "abc").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = ApplicationError::RecipientNotFound("a@b.co".to_string()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_maps_to_400() {
        let err: ApiError =
            ApplicationError::from(DomainError::InvalidQuantity("zero".to_string())).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn business_rule_maps_to_422() {
        let err: ApiError = ApplicationError::from(DomainError::InsufficientHoldings {
            available: 1,
            requested: 2,
        })
        .into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn ownership_and_conflicts() {
        let err: ApiError = ApplicationError::forbidden("not yours").into();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let err: ApiError =
            ApplicationError::from(RepositoryError::duplicate("Profile", "a@b.co")).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn unknown_failures_are_internal() {
        let err: ApiError = ApplicationError::internal("boom").into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
