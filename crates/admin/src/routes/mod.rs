//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness
//! GET  /health/ready                    - Readiness (database reachable)
//!
//! All /api routes require `Authorization: Bearer <ADMIN_API_TOKEN>`.
//!
//! # Catalog
//! GET/POST        /api/product-types
//! PUT/DELETE      /api/product-types/{id}     - DELETE takes ?confirm=true
//! GET/POST        /api/products               - GET takes ?product_type_id=
//! GET/PUT/DELETE  /api/products/{id}
//!
//! # Orders
//! GET             /api/orders                 - status, product_id, product_type_id, wilaya, range
//! GET/DELETE      /api/orders/{id}
//! PATCH           /api/orders/{id}/status
//!
//! # Shipping
//! GET/POST        /api/shipping
//! PUT/DELETE      /api/shipping/{wilaya}
//!
//! # Settings
//! GET/PUT         /api/settings
//! POST            /api/settings/refresh
//! ```

pub mod orders;
pub mod product_types;
pub mod products;
pub mod settings;
pub mod shipping;

use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post, put},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{request_id_middleware, require_api_token};
use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/product-types",
            get(product_types::list).post(product_types::create),
        )
        .route(
            "/product-types/{id}",
            put(product_types::update).delete(product_types::delete),
        )
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(orders::list))
        .route("/orders/{id}", get(orders::show).delete(orders::delete))
        .route("/orders/{id}/status", patch(orders::change_status))
}

/// Create the shipping and settings routes router.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/shipping", get(shipping::list).post(shipping::create))
        .route(
            "/shipping/{wilaya}",
            put(shipping::update).delete(shipping::delete),
        )
        .route("/settings", get(settings::show).put(settings::update))
        .route("/settings/refresh", post(settings::refresh))
}

/// Create all `/api` routes, guarded by the bearer token.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .merge(order_routes())
        .merge(store_routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            require_api_token,
        ))
}

/// The full application, minus the Sentry layers added by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", routes(state.clone()))
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
