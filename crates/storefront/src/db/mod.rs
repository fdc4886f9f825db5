//! Database access for the storefront.
//!
//! The storefront reads the catalog, shipping zones, reviews and store
//! settings, and writes orders and reviews. Schema and migrations are owned
//! by the admin crate (`crates/admin/migrations/`) and run via:
//! ```bash
//! cargo run -p souq-cli -- migrate
//! ```
//!
//! Every call goes through [`bounded`] so a stalled database surfaces as
//! [`RepositoryError::Unavailable`] instead of a hung request.

pub mod catalog;
pub mod orders;
pub mod reviews;
pub mod settings;
pub mod shipping;

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use souq_core::records::RecordError;

pub use catalog::CatalogRepository;
pub use orders::OrderRepository;
pub use reviews::ReviewRepository;
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

    /// Constraint violation.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::Unavailable(err.to_string())
            }
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) => Self::Unavailable(err.to_string()),
            sqlx::Error::RowNotFound => Self::NotFound,
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
/// Returns `RepositoryError::Unavailable` when `limit` elapses, otherwise
/// whatever the call itself returns.
pub async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
        Err(RepositoryError::Unavailable(format!(
            "no response within {}s",
            limit.as_secs()
        )))
    })
}
