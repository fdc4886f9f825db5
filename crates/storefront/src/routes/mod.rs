//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                           - Liveness
//! GET  /health/ready                     - Readiness (database reachable)
//!
//! GET  /api/settings                     - Public store settings
//! GET  /api/shipping                     - Shipping zones for the order form
//!
//! # Catalog
//! GET  /api/product-types                - Product types with product counts
//! GET  /api/product-types/{id}/products  - Products of a type
//! GET  /api/products/{id}                - Product detail
//! GET  /api/products/{id}/reviews        - Reviews, newest first
//! POST /api/products/{id}/reviews        - Add a review (rate limited)
//!
//! # Checkout
//! POST /api/products/{id}/quote          - Price quote
//! POST /api/orders                       - Place an order (rate limited)
//! ```

pub mod catalog;
pub mod checkout;
pub mod store;

use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{order_rate_limiter, request_id_middleware, review_rate_limiter};
use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/product-types", get(catalog::product_types))
        .route("/product-types/{id}/products", get(catalog::products_of_type))
        .route("/products/{id}", get(catalog::show))
        .route("/products/{id}/quote", post(checkout::quote))
        .route(
            "/products/{id}/reviews",
            get(catalog::reviews).merge(post(catalog::create_review).layer(review_rate_limiter())),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new().route(
        "/orders",
        post(checkout::place_order).layer(order_rate_limiter()),
    )
}

/// Create all `/api` routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(store::settings))
        .route("/shipping", get(store::shipping))
        .merge(catalog_routes())
        .merge(order_routes())
}

/// The full application: health checks, `/api` routes and the middleware
/// stack, minus the Sentry layers added by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", routes())
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    let ping = sqlx::query("SELECT 1").fetch_one(state.pool());
    match tokio::time::timeout(state.store_timeout(), ping).await {
        Ok(Ok(_)) => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    }
}
