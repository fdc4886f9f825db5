//! Product type repository.

use sqlx::PgPool;

use souq_core::ProductTypeId;
use souq_core::catalog::{ProductType, ProductTypeDraft, ProductTypeSummary};
use souq_core::records::{ProductTypeRow, ProductTypeSummaryRow};

use super::RepositoryError;

/// Repository for product types.
pub struct ProductTypeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductTypeRepository<'a> {
    /// Create a new product type repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List product types with their product counts, by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<ProductTypeSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductTypeSummaryRow>(
            r"
            SELECT pt.id, pt.name, pt.image_url, pt.created_at,
                   COUNT(p.id) AS product_count
            FROM product_types pt
            LEFT JOIN products p ON p.product_type_id = pt.id
            GROUP BY pt.id
            ORDER BY pt.name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a product type.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, draft: &ProductTypeDraft) -> Result<ProductType, RepositoryError> {
        let row = sqlx::query_as::<_, ProductTypeRow>(
            r"
            INSERT INTO product_types (id, name, image_url)
            VALUES ($1, $2, $3)
            RETURNING id, name, image_url, created_at
            ",
        )
        .bind(ProductTypeId::generate())
        .bind(draft.name.trim())
        .bind(non_blank(draft.image_url.as_deref()))
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Rename a product type or change its image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the type does not exist.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ProductTypeId,
        draft: &ProductTypeDraft,
    ) -> Result<ProductType, RepositoryError> {
        let row = sqlx::query_as::<_, ProductTypeRow>(
            r"
            UPDATE product_types
            SET name = $2, image_url = $3
            WHERE id = $1
            RETURNING id, name, image_url, created_at
            ",
        )
        .bind(id)
        .bind(draft.name.trim())
        .bind(non_blank(draft.image_url.as_deref()))
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Number of products filed under a type, or `None` if the type does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_count(&self, id: ProductTypeId) -> Result<Option<i64>, RepositoryError> {
        let count: Option<i64> = sqlx::query_scalar(
            r"
            SELECT (SELECT COUNT(*) FROM products WHERE product_type_id = pt.id)
            FROM product_types pt
            WHERE pt.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(count)
    }

    /// Delete a product type. Its products go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the type does not exist.
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductTypeId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product_types WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
