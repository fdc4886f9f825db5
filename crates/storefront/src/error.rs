//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors render as a JSON body
//! `{ "error": <code>, "message": <text> }`; server-side faults are captured
//! to Sentry first and their details are never sent to the client.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use souq_core::orders::ValidationError;
use souq_core::pricing::PricingError;

use crate::db::RepositoryError;
use crate::services::CheckoutError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// The database did not answer in time.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Client input broke a rule.
    #[error("{0}")]
    Validation(String),

    /// Same requester ordered the same product too recently.
    #[error("{0}")]
    Duplicate(String),

    /// Stored data cannot be priced.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl AppError {
    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Database(_) | Self::Pricing(_) | Self::Internal(_) => "internal_error",
            Self::Unavailable(_) => "service_unavailable",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation_error",
            Self::Duplicate(_) => "duplicate_order",
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Pricing(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Duplicate(_) => StatusCode::CONFLICT,
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Unavailable(reason) => Self::Unavailable(reason),
            RepositoryError::NotFound => Self::NotFound("resource"),
            other => Self::Database(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::ProductNotFound => Self::NotFound("product"),
            CheckoutError::Invalid(e) => e.into(),
            CheckoutError::Duplicate => Self::Duplicate(err.to_string()),
            CheckoutError::Pricing(PricingError::Overflow) => {
                Self::Validation(PricingError::Overflow.to_string())
            }
            CheckoutError::Pricing(e) => e.into(),
            CheckoutError::Repository(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Pricing(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::Unavailable(_) => "Service temporarily unavailable, please retry".to_string(),
            _ => self.to_string(),
        };

        let body = ErrorBody {
            error: self.code(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
