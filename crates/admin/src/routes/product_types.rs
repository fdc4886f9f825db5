//! Product type handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use souq_core::ProductTypeId;
use souq_core::catalog::{DeletionCheck, ProductType, ProductTypeDraft, ProductTypeSummary};

use crate::db::{self, ProductTypeRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub confirm: bool,
}

/// List product types with their product counts.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProductTypeSummary>>> {
    let types = db::bounded(
        state.store_timeout(),
        ProductTypeRepository::new(state.pool()).list(),
    )
    .await?;
    Ok(Json(types))
}

/// Create a product type.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProductTypeDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductType>)> {
    let Json(draft) = payload?;
    draft.validate().map_err(AppError::Validation)?;

    let created = db::bounded(
        state.store_timeout(),
        ProductTypeRepository::new(state.pool()).create(&draft),
    )
    .await?;
    tracing::info!(product_type_id = %created.id, name = %created.name, "Product type created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Rename a product type or change its image.
#[instrument(skip(state, payload), fields(product_type_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductTypeId>,
    payload: std::result::Result<Json<ProductTypeDraft>, JsonRejection>,
) -> Result<Json<ProductType>> {
    let Json(draft) = payload?;
    draft.validate().map_err(AppError::Validation)?;

    let updated = db::bounded(
        state.store_timeout(),
        ProductTypeRepository::new(state.pool()).update(id, &draft),
    )
    .await
    .map_err(|e| AppError::lookup(e, "product type"))?;
    Ok(Json(updated))
}

/// Delete a product type.
///
/// A type that still has products is only deleted, products included, when
/// the request carries `?confirm=true`.
#[instrument(skip(state), fields(product_type_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ProductTypeId>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode> {
    let repo = ProductTypeRepository::new(state.pool());
    let timeout = state.store_timeout();

    let product_count = db::bounded(timeout, repo.product_count(id))
        .await?
        .ok_or(AppError::NotFound("product type"))?;

    if let DeletionCheck::NeedsConfirmation { product_count } =
        DeletionCheck::evaluate(product_count, params.confirm)
    {
        return Err(AppError::ConfirmationRequired { product_count });
    }

    db::bounded(timeout, repo.delete(id))
        .await
        .map_err(|e| AppError::lookup(e, "product type"))?;
    tracing::info!(product_type_id = %id, product_count, "Product type deleted");
    Ok(StatusCode::NO_CONTENT)
}
