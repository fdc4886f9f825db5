//! Product reviews.

use sqlx::PgPool;

use souq_core::records::ReviewRow;
use souq_core::catalog::{Review, ReviewDraft};
use souq_core::{ProductId, ReviewId};

use super::RepositoryError;

const REVIEW_COLUMNS: &str = "id, product_id, reviewer_name, rating, comment, created_at";

/// Repository for product reviews.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Reviews for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored rating is out of range.
    pub async fn for_product(&self, product_id: ProductId) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE product_id = $1 ORDER BY created_at DESC"
        ))
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| Review::try_from(row).map_err(Into::into))
            .collect()
    }

    /// Store a validated review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        product_id: ProductId,
        draft: &ReviewDraft,
    ) -> Result<Review, RepositoryError> {
        let comment = draft
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "INSERT INTO reviews (id, product_id, reviewer_name, rating, comment) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(ReviewId::generate())
        .bind(product_id)
        .bind(draft.reviewer_name.trim())
        .bind(i16::from(draft.rating))
        .bind(comment)
        .fetch_one(self.pool)
        .await?;

        Ok(Review::try_from(row)?)
    }
}
