//! HTTP middleware stack for admin.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Bearer token guard (every `/api` route)

pub mod auth;
pub mod request_id;

pub use auth::require_api_token;
pub use request_id::request_id_middleware;
