//! Product handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use souq_core::catalog::{Product, ProductDraft};
use souq_core::{ProductId, ProductTypeId};

use crate::db::{self, ProductRepository, ProductTypeRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub product_type_id: Option<ProductTypeId>,
}

/// Validate a draft and check that its product type exists.
async fn checked_draft(state: &AppState, draft: &ProductDraft) -> Result<()> {
    draft.validate()?;

    let product_type = db::bounded(
        state.store_timeout(),
        ProductTypeRepository::new(state.pool()).product_count(draft.product_type_id),
    )
    .await?;
    if product_type.is_none() {
        return Err(AppError::Validation(format!(
            "product type {} does not exist",
            draft.product_type_id
        )));
    }
    Ok(())
}

/// List products, optionally of one type.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Product>>> {
    let products = db::bounded(
        state.store_timeout(),
        ProductRepository::new(state.pool()).list(params.product_type_id),
    )
    .await?;
    Ok(Json(products))
}

/// Get one product.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = db::bounded(state.store_timeout(), ProductRepository::new(state.pool()).get(id))
        .await
        .map_err(|e| AppError::lookup(e, "product"))?;
    Ok(Json(product))
}

/// Create a product.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProductDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>)> {
    let Json(draft) = payload?;
    checked_draft(&state, &draft).await?;

    let product = db::bounded(
        state.store_timeout(),
        ProductRepository::new(state.pool()).create(&draft),
    )
    .await?;
    tracing::info!(product_id = %product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product's fields.
#[instrument(skip(state, payload), fields(product_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    payload: std::result::Result<Json<ProductDraft>, JsonRejection>,
) -> Result<Json<Product>> {
    let Json(draft) = payload?;
    checked_draft(&state, &draft).await?;

    let product = db::bounded(
        state.store_timeout(),
        ProductRepository::new(state.pool()).update(id, &draft),
    )
    .await
    .map_err(|e| AppError::lookup(e, "product"))?;
    Ok(Json(product))
}

/// Delete a product. Its orders stay, detached from it.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<StatusCode> {
    db::bounded(
        state.store_timeout(),
        ProductRepository::new(state.pool()).delete(id),
    )
    .await
    .map_err(|e| AppError::lookup(e, "product"))?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
