//! Core types for Souq.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod fingerprint;
pub mod id;
pub mod phone;
pub mod price;
pub mod status;

pub use fingerprint::RequesterFingerprint;
pub use id::*;
pub use phone::{Phone, PhoneError};
pub use price::Price;
pub use status::OrderStatus;
