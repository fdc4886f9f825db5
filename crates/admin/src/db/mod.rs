//! Database operations for the admin API.
//!
//! # Tables
//!
//! - `product_types` - Catalog categories
//! - `products` - Products; options and quantity offers stored as JSONB
//! - `orders` - Customer orders with an `order_status` enum column
//! - `shipping_data` - Per-wilaya office and home delivery prices
//! - `store_settings` - Singleton row (id = 1)
//! - `reviews` - Written by the storefront, removed with their product
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p souq-cli -- migrate
//! ```

pub mod orders;
pub mod product_types;
pub mod products;
pub mod settings;
pub mod shipping;

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use souq_core::records::RecordError;

pub use orders::{OrderRepository, StatusChangeError, StatusUpdate};
pub use product_types::ProductTypeRepository;
pub use products::ProductRepository;
pub use settings::SettingsRepository;
pub use shipping::ShippingRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// The database could not be reached in time.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate wilaya, unknown product type).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => Self::Unavailable(err.to_string()),
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db)
                if db.is_unique_violation() || db.is_foreign_key_violation() =>
            {
                Self::Conflict(db.message().to_string())
            }
            other => Self::Database(other),
        }
    }
}

impl From<RecordError> for RepositoryError {
    fn from(err: RecordError) -> Self {
        Self::DataCorruption(err.to_string())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run a repository call with an upper bound on how long it may take.
///
/// # Errors
///
/// Returns `E::from(RepositoryError::Unavailable)` when `limit` elapses,
/// otherwise whatever the call itself returns.
pub async fn bounded<T, E, F>(limit: Duration, call: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<RepositoryError>,
{
    tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
        Err(RepositoryError::Unavailable(format!("no response within {}s", limit.as_secs())).into())
    })
}

/// Convert a count the engine keeps as `u32` to its `INTEGER` column.
fn to_column(column: &'static str, value: u32) -> Result<i32, RepositoryError> {
    i32::try_from(value).map_err(|_| RepositoryError::Conflict(format!("{column} {value} is too large")))
}
