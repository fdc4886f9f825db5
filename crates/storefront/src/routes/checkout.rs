//! Quote and order placement handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::instrument;

use souq_core::ProductId;
use souq_core::orders::Order;
use souq_core::pricing::Quote;

use crate::error::Result;
use crate::middleware::ClientFingerprint;
use crate::services::{CheckoutService, OrderRequest, QuoteRequest};
use crate::state::AppState;

/// Price a product for the page's current selections.
#[instrument(skip(state, payload), fields(product_id = %id))]
pub async fn quote(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    payload: std::result::Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<Quote>> {
    let Json(request) = payload?;
    let quote = CheckoutService::new(&state).quote(id, &request).await?;
    Ok(Json(quote))
}

/// Place an order.
#[instrument(skip(state, fingerprint, payload))]
pub async fn place_order(
    State(state): State<AppState>,
    ClientFingerprint(fingerprint): ClientFingerprint,
    payload: std::result::Result<Json<OrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>)> {
    let Json(request) = payload?;
    let order = CheckoutService::new(&state)
        .place_order(request, fingerprint, chrono::Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}
