//! Environment-driven configuration.

use std::fmt;

use crate::constants::{
    DEFAULT_REFRESH_SECS, DEFAULT_SESSION_TTL_SECS, DEFAULT_TITLE, PG_POOL_ACQUIRE_TIMEOUT_SECS,
};
use crate::env_config::{non_empty, parse_with_default};
use crate::error::CoreError;
use crate::scope::{Scope, TableName};

pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_PORT: &str = "DB_PORT";
pub const ENV_DB_NAME: &str = "DB_NAME";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_DB_ACQUIRE_TIMEOUT_SECS: &str = "DB_ACQUIRE_TIMEOUT_SECS";
pub const ENV_PUBLIC_TABLE: &str = "CHATLOG_PUBLIC_TABLE";
pub const ENV_SCOPES: &str = "CHATLOG_SCOPES";
pub const ENV_TITLE: &str = "CHATLOG_TITLE";
pub const ENV_REFRESH_SECS: &str = "CHATLOG_REFRESH_SECS";
pub const ENV_SESSION_TTL_SECS: &str = "CHATLOG_SESSION_TTL_SECS";
pub const ENV_COOKIE_SECURE: &str = "CHATLOG_COOKIE_SECURE";

/// Database connection parameters.
///
/// `url` wins over the individual parts when set.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    /// Longest wait for a pooled connection.
    pub acquire_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_owned(),
            port: 5432,
            name: "postgres".to_owned(),
            user: "postgres".to_owned(),
            password: "postgres".to_owned(),
            acquire_timeout_secs: PG_POOL_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

/// What the HTTP layer serves and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub title: String,
    pub refresh_secs: u64,
    /// Table served without login at `/`.
    pub public_table: Option<TableName>,
    pub session_ttl_secs: u64,
    pub cookie_secure: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            refresh_secs: DEFAULT_REFRESH_SECS,
            public_table: None,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            cookie_secure: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub db: DbConfig,
    pub viewer: ViewerConfig,
    /// Login-gated views; handed over to the auth service at startup.
    pub scopes: Vec<Scope>,
}

impl Config {
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| non_empty(lookup(var));
        let defaults = DbConfig::default();

        let db = DbConfig {
            url: get(ENV_DATABASE_URL),
            host: get(ENV_DB_HOST).unwrap_or(defaults.host),
            port: parse_with_default(ENV_DB_PORT, get(ENV_DB_PORT).as_deref(), defaults.port),
            name: get(ENV_DB_NAME).unwrap_or(defaults.name),
            user: get(ENV_DB_USER).unwrap_or(defaults.user),
            // Passwords may legitimately contain surrounding whitespace.
            password: lookup(ENV_DB_PASSWORD).unwrap_or(defaults.password),
            acquire_timeout_secs: parse_with_default(
                ENV_DB_ACQUIRE_TIMEOUT_SECS,
                get(ENV_DB_ACQUIRE_TIMEOUT_SECS).as_deref(),
                defaults.acquire_timeout_secs,
            ),
        };

        let public_table = get(ENV_PUBLIC_TABLE).map(|t| TableName::new(&t)).transpose()?;
        let scopes = get(ENV_SCOPES).map(|s| Scope::parse_list(&s)).transpose()?.unwrap_or_default();

        let viewer = ViewerConfig {
            title: get(ENV_TITLE).unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
            refresh_secs: parse_with_default(
                ENV_REFRESH_SECS,
                get(ENV_REFRESH_SECS).as_deref(),
                DEFAULT_REFRESH_SECS,
            ),
            public_table,
            session_ttl_secs: parse_with_default(
                ENV_SESSION_TTL_SECS,
                get(ENV_SESSION_TTL_SECS).as_deref(),
                DEFAULT_SESSION_TTL_SECS,
            ),
            cookie_secure: parse_with_default(
                ENV_COOKIE_SECURE,
                get(ENV_COOKIE_SECURE).as_deref(),
                false,
            ),
        };

        if viewer.public_table.is_none() && scopes.is_empty() {
            tracing::warn!("neither {ENV_PUBLIC_TABLE} nor {ENV_SCOPES} is set, nothing to serve");
        }

        Ok(Self { db, viewer, scopes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.db, DbConfig::default());
        assert_eq!(config.viewer, ViewerConfig::default());
        assert!(config.scopes.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_lookup(lookup(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_PASSWORD", " secret "),
            ("DB_ACQUIRE_TIMEOUT_SECS", "7"),
            ("CHATLOG_PUBLIC_TABLE", "chat_histories"),
            ("CHATLOG_SCOPES", "alpha=table_a,beta=table_b"),
            ("CHATLOG_REFRESH_SECS", "30"),
            ("CHATLOG_COOKIE_SECURE", "true"),
        ]))
        .unwrap();
        assert_eq!(config.db.host, "db.internal");
        assert_eq!(config.db.port, 6543);
        assert_eq!(config.db.password, " secret ");
        assert_eq!(config.db.acquire_timeout_secs, 7);
        assert_eq!(config.viewer.public_table.unwrap().as_str(), "chat_histories");
        assert_eq!(config.scopes.len(), 2);
        assert_eq!(config.scopes[1].table.as_str(), "table_b");
        assert_eq!(config.viewer.refresh_secs, 30);
        assert!(config.viewer.cookie_secure);
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = Config::from_lookup(lookup(&[("DB_PORT", "not-a-port")])).unwrap();
        assert_eq!(config.db.port, 5432);
    }

    #[test]
    fn test_invalid_table_is_error() {
        let result = Config::from_lookup(lookup(&[("CHATLOG_PUBLIC_TABLE", "x; drop")]));
        assert!(matches!(result, Err(CoreError::InvalidTableName(_))));
    }

    #[test]
    fn test_debug_redacts_password() {
        let db = DbConfig { url: Some("postgres://u:pw@h/d".to_owned()), ..DbConfig::default() };
        let shown = format!("{db:?}");
        assert!(!shown.contains("pw@"));
        assert!(shown.contains("<redacted>"));
    }
}
