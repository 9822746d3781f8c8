/// Structured error types for dbctl-core.
///
/// Library consumers get `thiserror` enums; the binary crate (dbctl-cli)
/// wraps them in `anyhow` with context. Client failures are not wrapped:
/// the connection manager hands back the client's own error type.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading configuration or the resource binding
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading a config or binding file failed
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Binding JSON could not be parsed
    #[error("Invalid resource binding in {origin}: {source}")]
    Binding {
        origin: String,
        source: serde_json::Error,
    },

    /// TOML settings could not be parsed
    #[error("Invalid config file {path:?}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Unknown log category name
    #[error("Unknown log category '{0}' (expected query, info, warn or error)")]
    LogCategory(String),
}

impl ConfigError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn binding(origin: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Binding {
            origin: origin.into(),
            source,
        }
    }
}
