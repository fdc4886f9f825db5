//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DUPLICATE_WINDOW_HOURS` - Duplicate-order window, at most 8760 (default: 6)
//! - `STOREFRONT_STORE_TIMEOUT_SECS` - Upper bound on each database call (default: 10)
//! - `STOREFRONT_SETTINGS_REFRESH_SECS` - Store settings reload interval (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use souq_core::orders::MAX_WINDOW_HOURS;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Length of the duplicate-order window in hours
    pub duplicate_window_hours: u32,
    /// Upper bound on each database call
    pub store_timeout: Duration,
    /// How often store settings are reloaded
    pub settings_refresh: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;
        let host = parse_env_or_default("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default("STOREFRONT_PORT", "3000")?;
        let duplicate_window_hours = bounded_window_hours(
            "STOREFRONT_DUPLICATE_WINDOW_HOURS",
            parse_env_or_default("STOREFRONT_DUPLICATE_WINDOW_HOURS", "6")?,
        )?;
        let store_timeout = Duration::from_secs(positive_secs(
            "STOREFRONT_STORE_TIMEOUT_SECS",
            parse_env_or_default("STOREFRONT_STORE_TIMEOUT_SECS", "10")?,
        )?);
        let settings_refresh = Duration::from_secs(positive_secs(
            "STOREFRONT_SETTINGS_REFRESH_SECS",
            parse_env_or_default("STOREFRONT_SETTINGS_REFRESH_SECS", "300")?,
        )?);

        Ok(Self {
            database_url,
            host,
            port,
            duplicate_window_hours,
            store_timeout,
            settings_refresh,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.1")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn positive_secs(key: &str, secs: u64) -> Result<u64, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(secs)
}

fn bounded_window_hours(key: &str, hours: u32) -> Result<u32, ConfigError> {
    if hours > MAX_WINDOW_HOURS {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be at most {MAX_WINDOW_HOURS}"),
        ));
    }
    Ok(hours)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_trims() {
        let port: u16 = parse_value("TEST_PORT", " 3000 ").unwrap();
        assert_eq!(port, 3000);
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<u16>("TEST_PORT", "eighty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "TEST_PORT"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(positive_secs("TEST_TIMEOUT", 0).is_err());
        assert_eq!(positive_secs("TEST_TIMEOUT", 5).unwrap(), 5);
    }

    #[test]
    fn test_duplicate_window_bounded() {
        assert_eq!(bounded_window_hours("TEST_WINDOW", 0).unwrap(), 0);
        assert_eq!(
            bounded_window_hours("TEST_WINDOW", MAX_WINDOW_HOURS).unwrap(),
            MAX_WINDOW_HOURS
        );
        let err = bounded_window_hours("TEST_WINDOW", 3_000_000_000).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "TEST_WINDOW"));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            duplicate_window_hours: 6,
            store_timeout: Duration::from_secs(10),
            settings_refresh: Duration::from_secs(300),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
