//! Shipping zone handlers. Zones are addressed by wilaya name.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::instrument;

use souq_core::catalog::{ShippingZone, ShippingZoneDraft};

use crate::db::{self, ShippingRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// List all shipping zones.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ShippingZone>>> {
    let zones = db::bounded(
        state.store_timeout(),
        ShippingRepository::new(state.pool()).list(),
    )
    .await?;
    Ok(Json(zones))
}

/// Create a zone for a wilaya that has none yet.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShippingZoneDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<ShippingZone>)> {
    let Json(draft) = payload?;
    let draft = draft.normalize()?;

    let zone = db::bounded(
        state.store_timeout(),
        ShippingRepository::new(state.pool()).create(&draft),
    )
    .await?;
    tracing::info!(wilaya = %zone.wilaya, communes = zone.communes.len(), "Shipping zone created");
    Ok((StatusCode::CREATED, Json(zone)))
}

/// Update a wilaya's prices and communes.
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    Path(wilaya): Path<String>,
    payload: std::result::Result<Json<ShippingZoneDraft>, JsonRejection>,
) -> Result<Json<ShippingZone>> {
    let Json(draft) = payload?;
    let draft = draft.normalize()?;

    let zone = db::bounded(
        state.store_timeout(),
        ShippingRepository::new(state.pool()).update(&wilaya, &draft),
    )
    .await
    .map_err(|e| AppError::lookup(e, "shipping zone"))?;
    Ok(Json(zone))
}

/// Delete a wilaya's zone. Orders to it are then priced with zero shipping.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(wilaya): Path<String>,
) -> Result<StatusCode> {
    db::bounded(
        state.store_timeout(),
        ShippingRepository::new(state.pool()).delete(&wilaya),
    )
    .await
    .map_err(|e| AppError::lookup(e, "shipping zone"))?;
    tracing::info!(%wilaya, "Shipping zone deleted");
    Ok(StatusCode::NO_CONTENT)
}
