//! dbctl-pg: PostgreSQL client for the dbctl connection manager
//!
//! Wraps a sqlx `PgPool` behind [`dbctl_core::DatabaseClient`] so the
//! manager can connect, probe and disconnect it.

pub mod client;
pub mod error;
pub mod pool;
pub mod row;

pub use client::PgClient;
pub use error::{PgClientError, PgResult};
pub use pool::{open_pool, PoolSettings};
