//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, info, warn};

use souq_core::catalog::ShippingZone;
use souq_core::orders::DuplicateGuard;
use souq_core::pricing::ShippingTable;
use souq_core::settings::{SettingsContext, StoreSettings};

use crate::config::StorefrontConfig;
use crate::db::{self, RepositoryError, SettingsRepository, ShippingRepository};

/// How long a loaded shipping table is served before it is re-read.
const SHIPPING_TTL: Duration = Duration::from_secs(60);

/// Shipping zones as loaded, plus the lookup table built from them.
#[derive(Debug)]
pub struct ShippingSnapshot {
    pub zones: Vec<ShippingZone>,
    pub table: ShippingTable,
}

impl ShippingSnapshot {
    #[must_use]
    pub fn new(zones: Vec<ShippingZone>) -> Self {
        let table = ShippingTable::from_zones(&zones);
        Self { zones, table }
    }

    /// The zone for a wilaya, if one is configured.
    #[must_use]
    pub fn zone(&self, wilaya: &str) -> Option<&ShippingZone> {
        let wilaya = wilaya.trim();
        self.zones.iter().find(|zone| zone.wilaya.trim() == wilaya)
    }
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    settings: SettingsContext,
    guard: DuplicateGuard,
    shipping: Cache<(), Arc<ShippingSnapshot>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// `settings` is the value loaded at startup; refreshes replace it in place.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool, settings: StoreSettings) -> Self {
        let shipping = Cache::builder()
            .max_capacity(1)
            .time_to_live(SHIPPING_TTL)
            .build();
        let guard = DuplicateGuard::from_hours(config.duplicate_window_hours);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                settings: SettingsContext::new(settings),
                guard,
                shipping,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the shared store settings.
    #[must_use]
    pub fn settings(&self) -> &SettingsContext {
        &self.inner.settings
    }

    #[must_use]
    pub fn duplicate_guard(&self) -> &DuplicateGuard {
        &self.inner.guard
    }

    /// Upper bound for a single store call.
    #[must_use]
    pub fn store_timeout(&self) -> Duration {
        self.inner.config.store_timeout
    }

    /// Current shipping zones, served from cache for up to a minute.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the zones have to be reloaded and the
    /// load fails.
    pub async fn shipping(&self) -> Result<Arc<ShippingSnapshot>, RepositoryError> {
        if let Some(snapshot) = self.inner.shipping.get(&()).await {
            debug!("Cache hit for shipping zones");
            return Ok(snapshot);
        }

        let zones = db::bounded(
            self.store_timeout(),
            ShippingRepository::new(self.pool()).zones(),
        )
        .await?;
        let snapshot = Arc::new(ShippingSnapshot::new(zones));

        self.inner.shipping.insert((), Arc::clone(&snapshot)).await;
        Ok(snapshot)
    }

    /// Reload store settings from the database into the shared context.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the settings cannot be loaded. The
    /// previous settings stay in place.
    pub async fn refresh_settings(&self) -> Result<(), RepositoryError> {
        let settings = db::bounded(
            self.store_timeout(),
            SettingsRepository::new(self.pool()).load(),
        )
        .await?;
        self.inner.settings.replace(settings);
        Ok(())
    }

    /// Spawn a background task that reloads settings on the configured interval.
    pub fn spawn_settings_refresh(&self) {
        let state = self.clone();
        let period = self.config().settings_refresh;
        info!(period_secs = period.as_secs(), "Spawning settings refresh task");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately; startup already loaded settings.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match state.refresh_settings().await {
                    Ok(()) => debug!("Store settings refreshed"),
                    Err(e) => warn!(error = %e, "Failed to refresh store settings"),
                }
            }
        });
    }
}
