//! Unified error handling for admin.
//!
//! Errors render as `{ "error": <code>, "message": <text> }`, with extra
//! fields where the merchant needs them to decide what to do next.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use souq_core::catalog::{ProductDraftError, ShippingZoneDraftError};
use souq_core::orders::InventoryError;
use souq_core::settings::SettingsError;

use crate::db::{RepositoryError, StatusChangeError};

/// Application-level error type for the admin API.
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

    /// Missing or wrong bearer token.
    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    /// Merchant input broke a rule.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness or reference constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Deleting the product type would delete its products too.
    #[error("product type has {product_count} products; repeat with ?confirm=true to delete them")]
    ConfirmationRequired { product_count: i64 },

    /// Limited stock cannot cover a delivery.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<u32>,
}

impl AppError {
    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Database(_) | Self::Internal(_) => "internal_error",
            Self::Unavailable(_) => "service_unavailable",
            Self::NotFound(_) => "not_found",
            Self::Unauthorized(_) => "unauthorized",
            Self::Validation(_) => "validation_error",
            Self::Conflict(_) => "conflict",
            Self::ConfirmationRequired { .. } => "confirmation_required",
            Self::Inventory(_) => "insufficient_inventory",
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict(_) | Self::ConfirmationRequired { .. } | Self::Inventory(_) => {
                StatusCode::CONFLICT
            }
        }
    }
}

impl AppError {
    /// Map a repository error from a lookup of `entity`, naming it in a 404.
    #[must_use]
    pub fn lookup(err: RepositoryError, entity: &'static str) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound(entity),
            other => other.into(),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Unavailable(reason) => Self::Unavailable(reason),
            RepositoryError::NotFound => Self::NotFound("resource"),
            RepositoryError::Conflict(reason) => Self::Conflict(reason),
            other => Self::Database(other),
        }
    }
}

impl From<StatusChangeError> for AppError {
    fn from(err: StatusChangeError) -> Self {
        match err {
            StatusChangeError::NotFound => Self::NotFound("order"),
            StatusChangeError::Inventory(e) => e.into(),
            StatusChangeError::Repository(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<ProductDraftError> for AppError {
    fn from(err: ProductDraftError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ShippingZoneDraftError> for AppError {
    fn from(err: ShippingZoneDraftError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Unavailable(_) => "Service temporarily unavailable, please retry".to_string(),
            _ => self.to_string(),
        };

        let (product_count, available, requested) = match &self {
            Self::ConfirmationRequired { product_count } => (Some(*product_count), None, None),
            Self::Inventory(InventoryError::Insufficient {
                available,
                requested,
            }) => (None, Some(*available), Some(*requested)),
            _ => (None, None, None),
        };

        let body = ErrorBody {
            error: self.code(),
            message,
            product_count,
            available,
            requested,
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
