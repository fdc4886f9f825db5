//! Catalog reads: product types and products.

use sqlx::PgPool;

use souq_core::records::{PRODUCT_COLUMNS, ProductRow, ProductTypeSummaryRow};
use souq_core::catalog::{Product, ProductTypeSummary};
use souq_core::{ProductId, ProductTypeId};

use super::RepositoryError;

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List product types with how many products each has, by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_types(&self) -> Result<Vec<ProductTypeSummary>, RepositoryError> {
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

    /// Whether a product type exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_type_exists(&self, id: ProductTypeId) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM product_types WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }

    /// Products of one type, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored product is malformed.
    pub async fn products_of_type(
        &self,
        product_type_id: ProductTypeId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE product_type_id = $1 ORDER BY created_at DESC"
        ))
        .bind(product_type_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| Product::try_from(row).map_err(Into::into))
            .collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored product is malformed.
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose().map_err(Into::into)
    }
}
