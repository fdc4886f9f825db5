//! Store-wide data: public settings and shipping zones.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use souq_core::Price;
use souq_core::settings::PublicStoreSettings;

use crate::error::Result;
use crate::state::AppState;

/// A wilaya as offered in the order form.
#[derive(Debug, Serialize)]
pub struct ShippingOption {
    pub wilaya: String,
    pub office_price: Price,
    pub home_price: Price,
    pub communes: Vec<String>,
}

/// Branding and contact settings safe for shoppers.
#[instrument(skip(state))]
pub async fn settings(State(state): State<AppState>) -> Json<PublicStoreSettings> {
    Json(state.settings().snapshot().into())
}

/// Shipping zones for the order form.
#[instrument(skip(state))]
pub async fn shipping(State(state): State<AppState>) -> Result<Json<Vec<ShippingOption>>> {
    let snapshot = state.shipping().await?;
    let options = snapshot
        .zones
        .iter()
        .map(|zone| ShippingOption {
            wilaya: zone.wilaya.clone(),
            office_price: zone.office_price,
            home_price: zone.home_price,
            communes: zone.communes.clone(),
        })
        .collect();
    Ok(Json(options))
}
