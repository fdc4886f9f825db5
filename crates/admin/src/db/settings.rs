//! Store settings persistence.

use sqlx::PgPool;
use sqlx::types::Json;

use souq_core::records::{SETTINGS_COLUMNS, StoreSettingsRow};
use souq_core::settings::StoreSettings;

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

    /// Write the full settings record, creating the row if needed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn save(&self, settings: &StoreSettings) -> Result<StoreSettings, RepositoryError> {
        let row = sqlx::query_as::<_, StoreSettingsRow>(&format!(
            r"
            INSERT INTO store_settings (
                id, store_name, logo_url, hero_images, social_media, phone_number,
                facebook_pixel_id, google_sheet_api_url, telegram_chat_id, theme_settings
            )
            VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                store_name = EXCLUDED.store_name,
                logo_url = EXCLUDED.logo_url,
                hero_images = EXCLUDED.hero_images,
                social_media = EXCLUDED.social_media,
                phone_number = EXCLUDED.phone_number,
                facebook_pixel_id = EXCLUDED.facebook_pixel_id,
                google_sheet_api_url = EXCLUDED.google_sheet_api_url,
                telegram_chat_id = EXCLUDED.telegram_chat_id,
                theme_settings = EXCLUDED.theme_settings,
                updated_at = NOW()
            RETURNING {SETTINGS_COLUMNS}
            "
        ))
        .bind(&settings.store_name)
        .bind(settings.logo_url.as_deref())
        .bind(&settings.hero_images)
        .bind(Json(&settings.social_media))
        .bind(settings.phone_number.as_deref())
        .bind(settings.facebook_pixel_id.as_deref())
        .bind(settings.google_sheet_api_url.as_deref())
        .bind(settings.telegram_chat_id.as_deref())
        .bind(Json(&settings.theme))
        .fetch_one(self.pool)
        .await?;

        Ok(StoreSettings::try_from(row)?)
    }
}
