//! Connection pool options
//!
//! Uses sqlx PgPool with explicit connection limits. The pool is opened
//! eagerly so a bad URL or unreachable server fails at connect time.

use std::time::Duration;

use dbctl_core::config::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

/// Default maximum connections for the pool.
/// Kept low: the manager holds one pool per process.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default slow-statement threshold
pub const DEFAULT_SLOW_STATEMENT: Duration = Duration::from_secs(1);

/// Pool sizing and statement logging knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub slow_statement: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            slow_statement: DEFAULT_SLOW_STATEMENT,
        }
    }
}

impl From<&DatabaseSettings> for PoolSettings {
    fn from(settings: &DatabaseSettings) -> Self {
        Self {
            max_connections: settings.max_connections.max(1),
            slow_statement: Duration::from_millis(settings.slow_statement_ms),
        }
    }
}

/// Open a PostgreSQL connection pool.
///
/// # Errors
///
/// Returns an error if the first connection cannot be established.
pub async fn open_pool(
    options: PgConnectOptions,
    settings: &PoolSettings,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
}
