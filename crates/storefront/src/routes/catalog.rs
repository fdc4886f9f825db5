//! Catalog route handlers: product types, products and reviews.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;
use tracing::instrument;

use souq_core::catalog::{Product, ProductTypeSummary, RatingSummary, Review, ReviewDraft};
use souq_core::{Price, ProductId, ProductTypeId};

use crate::db::{self, CatalogRepository, ReviewRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product detail as shown on the product page.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    /// Strike-through price, only when it is above the selling price.
    pub discount_reference: Option<Price>,
    pub rating: RatingSummary,
}

/// List product types with their product counts.
#[instrument(skip(state))]
pub async fn product_types(State(state): State<AppState>) -> Result<Json<Vec<ProductTypeSummary>>> {
    let types = db::bounded(
        state.store_timeout(),
        CatalogRepository::new(state.pool()).product_types(),
    )
    .await?;
    Ok(Json(types))
}

/// List the products of one type.
#[instrument(skip(state), fields(product_type_id = %id))]
pub async fn products_of_type(
    State(state): State<AppState>,
    Path(id): Path<ProductTypeId>,
) -> Result<Json<Vec<Product>>> {
    let catalog = CatalogRepository::new(state.pool());
    let timeout = state.store_timeout();

    if !db::bounded(timeout, catalog.product_type_exists(id)).await? {
        return Err(AppError::NotFound("product type"));
    }
    let products = db::bounded(timeout, catalog.products_of_type(id)).await?;
    Ok(Json(products))
}

/// Product detail with discount reference and rating summary.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    let timeout = state.store_timeout();
    let product = db::bounded(timeout, CatalogRepository::new(state.pool()).product(id))
        .await?
        .ok_or(AppError::NotFound("product"))?;
    let reviews = db::bounded(timeout, ReviewRepository::new(state.pool()).for_product(id)).await?;

    Ok(Json(ProductView {
        discount_reference: product.discount_reference(),
        rating: RatingSummary::from_reviews(&reviews),
        product,
    }))
}

/// Reviews for a product, newest first.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<Review>>> {
    let reviews = db::bounded(
        state.store_timeout(),
        ReviewRepository::new(state.pool()).for_product(id),
    )
    .await?;
    Ok(Json(reviews))
}

/// Post a review for a product.
#[instrument(skip(state, payload), fields(product_id = %id))]
pub async fn create_review(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    payload: std::result::Result<Json<ReviewDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Review>)> {
    let Json(draft) = payload?;
    draft.validate().map_err(AppError::Validation)?;

    let timeout = state.store_timeout();
    if db::bounded(timeout, CatalogRepository::new(state.pool()).product(id))
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("product"));
    }

    let review = db::bounded(
        timeout,
        ReviewRepository::new(state.pool()).create(id, &draft),
    )
    .await?;
    tracing::info!(review_id = %review.id, rating = review.rating, "Review added");
    Ok((StatusCode::CREATED, Json(review)))
}
