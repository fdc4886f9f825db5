//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use sqlx::PgPool;

use secrecy::ExposeSecret;
use souq_core::settings::{SettingsContext, StoreSettings};

use crate::config::AdminConfig;
use crate::db::{self, RepositoryError, SettingsRepository};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    settings: SettingsContext,
    token_digest: [u8; 32],
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool, settings: StoreSettings) -> Self {
        let token_digest = Sha256::digest(config.api_token.expose_secret().as_bytes()).into();
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                settings: SettingsContext::new(settings),
                token_digest,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The settings context handed out to request handlers.
    #[must_use]
    pub fn settings(&self) -> &SettingsContext {
        &self.inner.settings
    }

    #[must_use]
    pub fn store_timeout(&self) -> Duration {
        self.inner.config.store_timeout
    }

    /// Whether `presented` is the configured API token.
    ///
    /// Digests are compared so the comparison does not depend on where the
    /// first differing byte sits.
    #[must_use]
    pub fn accepts_token(&self, presented: &str) -> bool {
        let digest: [u8; 32] = Sha256::digest(presented.as_bytes()).into();
        digest
            .iter()
            .zip(self.inner.token_digest.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// Reload settings from the store into the shared context.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the load fails; the context keeps its
    /// previous contents.
    pub async fn refresh_settings(&self) -> Result<StoreSettings, RepositoryError> {
        let settings = db::bounded(
            self.store_timeout(),
            SettingsRepository::new(self.pool()).load(),
        )
        .await?;
        self.inner.settings.replace(settings.clone());
        Ok(settings)
    }
}
