//! PostgreSQL storage backend using sqlx.

mod chat_log;

use std::time::Duration;

use chatlog_core::{DbConfig, PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::error::StorageError;

/// Pooled PostgreSQL access.
///
/// The pool connects lazily, so the process starts even while the database
/// is unreachable; every request checks a connection out and returns it
/// whether the query succeeds or fails.
#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(config: &DbConfig) -> Result<Self, StorageError> {
        let options = connect_options(config)?;
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect_lazy_with(options);
        tracing::info!(host = %config.host, database = %config.name, "PgStorage initialized");
        Ok(Self { pool })
    }

    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn connect_options(config: &DbConfig) -> Result<PgConnectOptions, StorageError> {
    if let Some(url) = &config.url {
        return url.parse::<PgConnectOptions>().map_err(StorageError::from);
    }
    Ok(PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.name)
        .username(&config.user)
        .password(&config.password))
}

/// Convert `usize` to `i64` for SQL LIMIT binds.
/// Saturates to `i64::MAX` on overflow (only possible on 128-bit targets).
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_options_from_parts() {
        let config = DbConfig { host: "db".to_owned(), port: 6000, ..DbConfig::default() };
        let options = connect_options(&config).unwrap();
        assert_eq!(options.get_host(), "db");
        assert_eq!(options.get_port(), 6000);
        assert_eq!(options.get_database(), Some("postgres"));
    }

    #[test]
    fn test_connect_options_url_wins() {
        let config = DbConfig {
            url: Some("postgres://alice:pw@example.org:7000/logs".to_owned()),
            ..DbConfig::default()
        };
        let options = connect_options(&config).unwrap();
        assert_eq!(options.get_host(), "example.org");
        assert_eq!(options.get_port(), 7000);
        assert_eq!(options.get_username(), "alice");
        assert_eq!(options.get_database(), Some("logs"));
    }

    #[test]
    fn test_connect_options_bad_url() {
        let config = DbConfig { url: Some("not a url".to_owned()), ..DbConfig::default() };
        assert!(connect_options(&config).is_err());
    }

    #[test]
    fn test_usize_to_i64() {
        assert_eq!(usize_to_i64(5), 5);
    }
}
