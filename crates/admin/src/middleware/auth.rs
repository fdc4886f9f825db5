//! Bearer-token guard for the admin API.
//!
//! Every `/api` route sits behind [`require_api_token`]. The token is the
//! single `ADMIN_API_TOKEN` secret; there are no per-user accounts.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// The token presented in an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Reject requests without the configured bearer token.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` when the header is missing, malformed
/// or carries the wrong token.
pub async fn require_api_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(request.headers()) else {
        return Err(AppError::Unauthorized("missing bearer token"));
    };

    if !state.accepts_token(token) {
        tracing::warn!(path = %request.uri().path(), "Rejected admin request with wrong token");
        return Err(AppError::Unauthorized("invalid token"));
    }

    Ok(next.run(request).await)
}
