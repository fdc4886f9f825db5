//! Souq Core - Shared types and store rules.
//!
//! This crate provides the domain model and the pricing/order rule engine used
//! by all Souq components:
//! - `storefront` - Public-facing catalog and checkout API
//! - `admin` - Merchant API for catalog, orders, shipping and settings
//! - `cli` - Command-line tools for migrations, seeding and offline quotes
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP,
//! no clock reads. Callers pass `now` and any loaded records in explicitly.
//! The optional `postgres` feature adds `sqlx` encoding and the row types in
//! [`records`].
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, phone numbers and statuses
//! - [`catalog`] - Products, options, quantity offers, shipping zones, reviews
//! - [`pricing`] - Option modifiers, quantity tiers, shipping cost, quotes
//! - [`orders`] - Checkout validation, duplicate guard, status transitions
//! - [`settings`] - Store settings and the shared settings context

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod orders;
pub mod pricing;
#[cfg(feature = "postgres")]
pub mod records;
pub mod settings;
pub mod types;

pub use types::*;
