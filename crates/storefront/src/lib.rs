//! Souq Storefront library.
//!
//! The public JSON API behind the shop front end: catalog browsing, price
//! quotes and order placement. Exposed as a library so the router can be
//! exercised from the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
