//! Souq Admin library.
//!
//! This crate provides the merchant API as a library, allowing it to be
//! tested and reused.
//!
//! # Security
//!
//! This crate has write access to the whole catalog, every order and the
//! store settings. All `/api` routes are behind the bearer-token guard in
//! [`middleware::auth`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
