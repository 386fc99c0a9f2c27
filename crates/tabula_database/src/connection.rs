//! Connection settings and connection setup.

use crate::DatabaseResult;
use derive_getters::Getters;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use tabula_error::{ConfigError, ConfigOrigin, DatabaseError, DatabaseErrorKind};
use tracing::{debug, error, instrument};

/// Connections kept by [`create_pool`] unless configured otherwise.
pub const DEFAULT_POOL_SIZE: u32 = 4;

/// Where and how to connect.
///
/// ```
/// use tabula_database::DatabaseConfig;
///
/// let config = DatabaseConfig::new("postgres://localhost/app").with_pool_size(8);
/// assert_eq!(*config.pool_size(), 8);
/// ```
#[derive(Clone, PartialEq, Eq, Getters)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    url: String,
    /// Connections held by a pool
    pool_size: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The URL may carry a password.
        f.debug_struct("DatabaseConfig")
            .field("pool_size", &self.pool_size)
            .finish_non_exhaustive()
    }
}

impl DatabaseConfig {
    /// Settings for `url` with the default pool size.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }

    /// Replace the pool size.
    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Read settings from the environment, loading `.env` if present.
    ///
    /// Reads:
    /// - `DATABASE_URL` (required)
    /// - `TABULA_DB_POOL_SIZE` (default: 4)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or blank, or if the
    /// pool size is not a positive integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::new(ConfigOrigin::Environment, "not set").with_key("DATABASE_URL")
            })?;

        let pool_size = match lookup("TABULA_DB_POOL_SIZE") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::new(
                        ConfigOrigin::Environment,
                        format!("must be a positive integer, got '{}'", raw),
                    )
                    .with_key("TABULA_DB_POOL_SIZE"));
                }
            },
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Self { url, pool_size })
    }
}

/// Open a single connection.
///
/// # Errors
///
/// Returns `Connection` if PostgreSQL refuses the connection.
#[instrument(name = "database.establish_connection", skip(config))]
pub fn establish_connection(config: &DatabaseConfig) -> DatabaseResult<PgConnection> {
    PgConnection::establish(config.url()).map_err(|e| {
        error!(error = %e, "Failed to connect to PostgreSQL");
        DatabaseError::new(DatabaseErrorKind::Connection(e.to_string()))
    })
}

/// Build an r2d2 pool of `config.pool_size()` connections.
///
/// # Errors
///
/// Returns `Pool` if the pool cannot open its initial connections.
#[instrument(name = "database.create_pool", skip(config), fields(pool_size = config.pool_size()))]
pub fn create_pool(config: &DatabaseConfig) -> DatabaseResult<Pool<ConnectionManager<PgConnection>>> {
    debug!("Building PostgreSQL pool");
    Pool::builder()
        .max_size(*config.pool_size())
        .build(ConnectionManager::<PgConnection>::new(config.url().as_str()))
        .map_err(|e| {
            error!(error = %e, "Failed to build connection pool");
            DatabaseError::new(DatabaseErrorKind::Pool(e.to_string()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_lookup_defaults_pool_size() {
        let config =
            DatabaseConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://db/app")])).unwrap();
        assert_eq!(config.url(), "postgres://db/app");
        assert_eq!(*config.pool_size(), DEFAULT_POOL_SIZE);
    }

    #[test]
    fn test_lookup_reads_pool_size() {
        let config = DatabaseConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/app"),
            ("TABULA_DB_POOL_SIZE", " 12 "),
        ]))
        .unwrap();
        assert_eq!(*config.pool_size(), 12);
    }

    #[test]
    fn test_lookup_requires_url() {
        let err = DatabaseConfig::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap_err();
        assert_eq!(err.key.as_deref(), Some("DATABASE_URL"));
        assert_eq!(err.origin, ConfigOrigin::Environment);
    }

    #[test]
    fn test_lookup_rejects_zero_pool() {
        for raw in ["0", "-2", "many"] {
            let err = DatabaseConfig::from_lookup(lookup(&[
                ("DATABASE_URL", "postgres://db/app"),
                ("TABULA_DB_POOL_SIZE", raw),
            ]))
            .unwrap_err();
            assert_eq!(err.key.as_deref(), Some("TABULA_DB_POOL_SIZE"));
        }
    }

    #[test]
    fn test_debug_hides_url() {
        let config = DatabaseConfig::new("postgres://user:hunter2@db/app");
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
