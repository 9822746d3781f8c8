pub mod binding;
pub mod client;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod manager;
pub mod redact;

pub use binding::{
    resolve_datasource_url, resolve_from_process_env, ResolvedUrl, ResourceBinding, UrlSource,
    DEFAULT_ENV_VAR,
};
pub use client::{DatabaseClient, MockClient, MockError, RawRow};
pub use config::{ConnectionConfig, DbctlConfig, LogCategory};
pub use error::ConfigError;
pub use lifecycle::{LifecycleHook, LifecycleHost};
pub use manager::{ConnectionManager, ConnectionState};
pub use redact::redact_url;
