//! Store settings handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::instrument;

use souq_core::settings::{StoreSettings, StoreSettingsPatch};

use crate::db::{self, SettingsRepository};
use crate::error::Result;
use crate::state::AppState;

/// Current settings, as held by the settings context.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<StoreSettings> {
    Json(state.settings().snapshot())
}

/// Apply a partial update to the stored settings.
///
/// The patch is applied to the stored record, not the context, so edits made
/// elsewhere since the last refresh are not overwritten.
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    payload: std::result::Result<Json<StoreSettingsPatch>, JsonRejection>,
) -> Result<Json<StoreSettings>> {
    let Json(patch) = payload?;
    let repo = SettingsRepository::new(state.pool());
    let timeout = state.store_timeout();

    let current = db::bounded(timeout, repo.load()).await?;
    let next = patch.apply(&current)?;
    let saved = db::bounded(timeout, repo.save(&next)).await?;

    state.settings().replace(saved.clone());
    tracing::info!(store = %saved.store_name, "Store settings updated");
    Ok(Json(saved))
}

/// Reload the settings context from the store.
#[instrument(skip(state))]
pub async fn refresh(State(state): State<AppState>) -> Result<Json<StoreSettings>> {
    let settings = state.refresh_settings().await?;
    tracing::info!(store = %settings.store_name, "Store settings refreshed");
    Ok(Json(settings))
}
