//! Shared constants for chatlog-viewer.

/// Number of most recent distinct dates offered in the pagination strip.
pub const MAX_AVAILABLE_DATES: usize = 5;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 10;

/// PostgreSQL connection pool: acquire timeout in seconds.
///
/// Bounds how long a page waits before showing the database error while
/// Postgres is down.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 3;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Default bind address of the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port of the HTTP server.
pub const DEFAULT_PORT: u16 = 8082;

/// Seconds between automatic reloads of a log page.
pub const DEFAULT_REFRESH_SECS: u64 = 60;

/// Idle lifetime of a login session (12 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 12 * 60 * 60;

/// Interval of the background sweep that drops expired login sessions.
pub const SESSION_PURGE_INTERVAL_SECS: u64 = 300;

/// Cookie carrying the login session token.
pub const SESSION_COOKIE_NAME: &str = "chatlog_session";

/// Default page title prefix.
pub const DEFAULT_TITLE: &str = "Chat Logs";

/// Format of the `date` query parameter and of pagination labels.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of per-message timestamps in rendered pages.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
