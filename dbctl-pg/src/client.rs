//! PostgreSQL implementation of [`DatabaseClient`]
//!
//! Construction only parses options; nothing touches the network until
//! `connect()`. Without an explicit URL, sqlx's own discovery applies
//! (`PGHOST`, `PGPORT`, `PGUSER`, `PGPASSWORD`, `PGDATABASE`, ...).

use std::str::FromStr;

use async_trait::async_trait;
use dbctl_core::{ConnectionConfig, DatabaseClient, LogCategory, RawRow};
use log::LevelFilter;
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool};
use tracing::{error, info};

use crate::error::{PgClientError, PgResult};
use crate::pool::{open_pool, PoolSettings};
use crate::row::row_to_json;

pub struct PgClient {
    options: PgConnectOptions,
    settings: PoolSettings,
    config: ConnectionConfig,
    pool: Option<PgPool>,
}

impl PgClient {
    pub fn new(config: ConnectionConfig, settings: PoolSettings) -> PgResult<Self> {
        let options = match config.datasource_url.as_deref() {
            Some(url) => PgConnectOptions::from_str(url)
                .map_err(|e| PgClientError::InvalidUrl(e.to_string()))?,
            None => PgConnectOptions::new(),
        };
        let options = apply_log_events(options, &config, &settings);

        Ok(Self {
            options,
            settings,
            config,
            pool: None,
        })
    }

    /// Whether an explicit datasource URL was supplied at construction
    pub fn has_url_override(&self) -> bool {
        self.config.datasource_url.is_some()
    }

    pub fn connect_options(&self) -> &PgConnectOptions {
        &self.options
    }

    /// The live pool, once connected
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.pool.as_ref().is_some_and(|p| !p.is_closed())
    }
}

/// `query` turns on statement logging at DEBUG; `warn` reports slow statements.
fn apply_log_events(
    options: PgConnectOptions,
    config: &ConnectionConfig,
    settings: &PoolSettings,
) -> PgConnectOptions {
    let queries = config.logs(LogCategory::Query);
    let slow = config.logs(LogCategory::Warn);
    if !queries && !slow {
        return options.disable_statement_logging();
    }

    let statement_level = if queries {
        LevelFilter::Debug
    } else {
        LevelFilter::Off
    };
    let slow_level = if slow {
        LevelFilter::Warn
    } else {
        LevelFilter::Off
    };
    options
        .log_statements(statement_level)
        .log_slow_statements(slow_level, settings.slow_statement)
}

#[async_trait]
impl DatabaseClient for PgClient {
    type Error = PgClientError;

    async fn connect(&mut self) -> PgResult<()> {
        match open_pool(self.options.clone(), &self.settings).await {
            Ok(pool) => {
                if self.config.logs(LogCategory::Info) {
                    info!(
                        host = self.options.get_host(),
                        port = self.options.get_port(),
                        max_connections = self.settings.max_connections,
                        "Opened PostgreSQL pool"
                    );
                }
                self.pool = Some(pool);
                Ok(())
            }
            Err(e) => {
                if self.config.logs(LogCategory::Error) {
                    error!(host = self.options.get_host(), error = %e, "PostgreSQL connect failed");
                }
                Err(e.into())
            }
        }
    }

    async fn disconnect(&mut self) -> PgResult<()> {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
            if self.config.logs(LogCategory::Info) {
                info!("Closed PostgreSQL pool");
            }
        }
        Ok(())
    }

    async fn query_raw(&self, sql: &str) -> PgResult<Vec<RawRow>> {
        let pool = self.pool.as_ref().ok_or(PgClientError::NotConnected)?;
        let rows = sqlx::query(sql).fetch_all(pool).await.map_err(|e| {
            if self.config.logs(LogCategory::Error) {
                error!(error = %e, "Raw query failed");
            }
            PgClientError::from(e)
        })?;

        rows.iter()
            .map(|row| row_to_json(row).map_err(PgClientError::from))
            .collect()
    }
}
