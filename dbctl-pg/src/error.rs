//! Error types for dbctl-pg

use thiserror::Error;

pub type PgResult<T> = Result<T, PgClientError>;

#[derive(Error, Debug)]
pub enum PgClientError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid datasource URL: {0}")]
    InvalidUrl(String),

    #[error("Not connected: call connect() first")]
    NotConnected,
}
