//! Order handlers: listing, deletion and status changes.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use souq_core::orders::{Order, OrderFilter};
use souq_core::{OrderId, OrderStatus};

use crate::db::{self, OrderRepository, StatusUpdate};
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

/// List orders matching the query-string filters, newest first.
#[instrument(skip(state, filter))]
pub async fn list(
    State(state): State<AppState>,
    filter: std::result::Result<Query<OrderFilter>, QueryRejection>,
) -> Result<Json<Vec<Order>>> {
    let Query(filter) = filter?;
    let orders = db::bounded(
        state.store_timeout(),
        OrderRepository::new(state.pool()).list(&filter, chrono::Utc::now()),
    )
    .await?;
    Ok(Json(orders))
}

/// Get one order.
#[instrument(skip(state), fields(order_id = %id))]
pub async fn show(State(state): State<AppState>, Path(id): Path<OrderId>) -> Result<Json<Order>> {
    let order = db::bounded(state.store_timeout(), OrderRepository::new(state.pool()).get(id))
        .await
        .map_err(|e| AppError::lookup(e, "order"))?;
    Ok(Json(order))
}

/// Delete an order.
#[instrument(skip(state), fields(order_id = %id))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<OrderId>) -> Result<StatusCode> {
    db::bounded(
        state.store_timeout(),
        OrderRepository::new(state.pool()).delete(id),
    )
    .await
    .map_err(|e| AppError::lookup(e, "order"))?;
    tracing::info!(order_id = %id, "Order deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Move an order to a new status, applying any inventory effect.
#[instrument(skip(state, payload), fields(order_id = %id))]
pub async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    payload: std::result::Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<StatusUpdate>> {
    let Json(StatusRequest { status }) = payload?;
    let update = db::bounded(
        state.store_timeout(),
        OrderRepository::new(state.pool()).change_status(id, status),
    )
    .await?;
    Ok(Json(update))
}
