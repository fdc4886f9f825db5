//! Business logic services for storefront.
//!
//! # Services
//!
//! - `checkout` - Server-side quotes and order placement

pub mod checkout;

pub use checkout::{CheckoutError, CheckoutService, OrderRequest, QuoteRequest};
