//! Checkout error types.

use thiserror::Error;

use souq_core::orders::ValidationError;
use souq_core::pricing::PricingError;

use crate::db::RepositoryError;

/// Errors that can occur while quoting or placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The product does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// The order form broke a checkout rule.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The same requester ordered this product inside the duplicate window.
    #[error("an order for this product was already placed recently")]
    Duplicate,

    /// The stored product cannot be priced.
    #[error("pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
