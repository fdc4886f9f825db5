//! Product repository.

use sqlx::PgPool;
use sqlx::types::Json;

use souq_core::catalog::{Product, ProductDraft};
use souq_core::records::{PRODUCT_COLUMNS, ProductRow};
use souq_core::{ProductId, ProductTypeId};

use super::{RepositoryError, to_column};

/// Repository for products.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, newest first, optionally limited to one type.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored product is malformed.
    pub async fn list(
        &self,
        product_type_id: Option<ProductTypeId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE $1::uuid IS NULL OR product_type_id = $1 \
             ORDER BY created_at DESC"
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
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::DataCorruption` if the stored product is malformed.
    pub async fn get(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(Product::try_from(row)?)
    }

    /// Create a product from a validated draft.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product type does not exist.
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO products (
                id, product_type_id, name, description, description_content, base_price,
                price_before_discount, images, options, quantity_offers, min_quantity, max_quantity
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(ProductId::generate())
        .bind(draft.product_type_id)
        .bind(draft.name.trim())
        .bind(draft.description.as_deref())
        .bind(Json(&draft.description_content))
        .bind(draft.base_price)
        .bind(draft.price_before_discount)
        .bind(&draft.images)
        .bind(Json(&draft.options))
        .bind(Json(&draft.quantity_offers))
        .bind(to_column("min_quantity", draft.min_quantity)?)
        .bind(
            draft
                .max_quantity
                .map(|max| to_column("max_quantity", max))
                .transpose()?,
        )
        .fetch_one(self.pool)
        .await?;

        Ok(Product::try_from(row)?)
    }

    /// Replace a product's fields with a validated draft.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the product type does not exist.
    pub async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE products SET
                product_type_id = $2, name = $3, description = $4, description_content = $5,
                base_price = $6, price_before_discount = $7, images = $8, options = $9,
                quantity_offers = $10, min_quantity = $11, max_quantity = $12,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(draft.product_type_id)
        .bind(draft.name.trim())
        .bind(draft.description.as_deref())
        .bind(Json(&draft.description_content))
        .bind(draft.base_price)
        .bind(draft.price_before_discount)
        .bind(&draft.images)
        .bind(Json(&draft.options))
        .bind(Json(&draft.quantity_offers))
        .bind(to_column("min_quantity", draft.min_quantity)?)
        .bind(
            draft
                .max_quantity
                .map(|max| to_column("max_quantity", max))
                .transpose()?,
        )
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(Product::try_from(row)?)
    }

    /// Delete a product. Its orders keep their snapshot with `product_id` cleared.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
