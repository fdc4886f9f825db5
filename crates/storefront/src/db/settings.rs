//! Store settings reads.

use sqlx::PgPool;

use souq_core::settings::StoreSettings;
use souq_core::records::{SETTINGS_COLUMNS, StoreSettingsRow};

use super::RepositoryError;

/// Repository for the singleton store settings row.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load the store settings, or the defaults when the row is missing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a JSON column is malformed.
    pub async fn load(&self) -> Result<StoreSettings, RepositoryError> {
        let row = sqlx::query_as::<_, StoreSettingsRow>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM store_settings WHERE id = 1"
        ))
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(StoreSettings::try_from(row)?),
            None => {
                tracing::warn!("store_settings row missing, using defaults");
                Ok(StoreSettings::default())
            }
        }
    }
}
