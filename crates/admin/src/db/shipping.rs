//! Shipping zone repository. Zones are addressed by wilaya name.

use sqlx::PgPool;

use souq_core::ShippingZoneId;
use souq_core::catalog::{ShippingZone, ShippingZoneDraft};
use souq_core::records::ShippingZoneRow;

use super::RepositoryError;

const ZONE_COLUMNS: &str = "id, wilaya, base_price, shipping_home_price, communes";

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
    pub async fn list(&self) -> Result<Vec<ShippingZone>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShippingZoneRow>(&format!(
            "SELECT {ZONE_COLUMNS} FROM shipping_data ORDER BY wilaya"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a zone from a normalised draft.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the wilaya already has a zone.
    pub async fn create(&self, draft: &ShippingZoneDraft) -> Result<ShippingZone, RepositoryError> {
        let row = sqlx::query_as::<_, ShippingZoneRow>(&format!(
            r"
            INSERT INTO shipping_data (id, wilaya, base_price, shipping_home_price, communes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ZONE_COLUMNS}
            "
        ))
        .bind(ShippingZoneId::generate())
        .bind(&draft.wilaya)
        .bind(draft.office_price)
        .bind(draft.home_price)
        .bind(&draft.communes)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Create or replace the zone for `draft.wilaya`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn upsert(&self, draft: &ShippingZoneDraft) -> Result<ShippingZone, RepositoryError> {
        let row = sqlx::query_as::<_, ShippingZoneRow>(&format!(
            r"
            INSERT INTO shipping_data (id, wilaya, base_price, shipping_home_price, communes)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (wilaya) DO UPDATE SET
                base_price = EXCLUDED.base_price,
                shipping_home_price = EXCLUDED.shipping_home_price,
                communes = EXCLUDED.communes
            RETURNING {ZONE_COLUMNS}
            "
        ))
        .bind(ShippingZoneId::generate())
        .bind(&draft.wilaya)
        .bind(draft.office_price)
        .bind(draft.home_price)
        .bind(&draft.communes)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update the zone for `wilaya`. The draft may rename it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no zone exists for `wilaya`.
    /// Returns `RepositoryError::Conflict` if the new name is already taken.
    pub async fn update(
        &self,
        wilaya: &str,
        draft: &ShippingZoneDraft,
    ) -> Result<ShippingZone, RepositoryError> {
        let row = sqlx::query_as::<_, ShippingZoneRow>(&format!(
            r"
            UPDATE shipping_data
            SET wilaya = $2, base_price = $3, shipping_home_price = $4, communes = $5
            WHERE wilaya = $1
            RETURNING {ZONE_COLUMNS}
            "
        ))
        .bind(wilaya.trim())
        .bind(&draft.wilaya)
        .bind(draft.office_price)
        .bind(draft.home_price)
        .bind(&draft.communes)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete the zone for `wilaya`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no zone exists for `wilaya`.
    pub async fn delete(&self, wilaya: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shipping_data WHERE wilaya = $1")
            .bind(wilaya.trim())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
