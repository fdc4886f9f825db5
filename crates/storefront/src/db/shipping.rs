//! Shipping zone reads.

use sqlx::PgPool;

use souq_core::catalog::ShippingZone;
use souq_core::records::ShippingZoneRow;

use super::RepositoryError;

/// Repository for shipping zones.
pub struct ShippingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShippingRepository<'a> {
    /// Create a new shipping repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All shipping zones ordered by wilaya.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn zones(&self) -> Result<Vec<ShippingZone>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShippingZoneRow>(
            r"
            SELECT id, wilaya, base_price, shipping_home_price, communes
            FROM shipping_data
            ORDER BY wilaya
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
