//! Datasource URL resolution
//!
//! Priority order (highest to lowest):
//! 1. `connectionString` of the platform resource binding
//! 2. The named environment variable (default `DATABASE_URL`)
//! 3. Nothing: the client applies its own default discovery
//!
//! Empty or whitespace-only values are treated as absent at every level.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable consulted when the binding carries no URL
pub const DEFAULT_ENV_VAR: &str = "DATABASE_URL";

/// Environment variable holding a path to a binding JSON file
pub const BINDING_FILE_ENV: &str = "DBCTL_BINDING_FILE";

/// Environment variable holding inline binding JSON
pub const BINDING_JSON_ENV: &str = "DBCTL_BINDING";

/// Platform-provided infrastructure binding
///
/// Wire shape: `{ "connectionString": "postgres://..." }`. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceBinding {
    #[serde(default)]
    pub connection_string: Option<String>,
}

impl ResourceBinding {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: Some(connection_string.into()),
        }
    }

    /// Parse a binding from JSON text
    pub fn from_json(json: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::binding(origin, e))
    }

    /// Load a binding from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        Self::from_json(&contents, &path.display().to_string())
    }

    /// Load the binding the platform exposes through the process environment.
    ///
    /// `DBCTL_BINDING_FILE` wins over inline `DBCTL_BINDING`. Returns `Ok(None)`
    /// when neither is set.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        if let Some(path) = non_empty(std::env::var(BINDING_FILE_ENV).ok()) {
            return Self::from_file(Path::new(&path)).map(Some);
        }
        match non_empty(std::env::var(BINDING_JSON_ENV).ok()) {
            Some(json) => Self::from_json(&json, BINDING_JSON_ENV).map(Some),
            None => Ok(None),
        }
    }

    /// The connection string, if present and non-blank
    pub fn url(&self) -> Option<&str> {
        self.connection_string
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Where the resolved datasource URL came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSource {
    Binding,
    Environment,
    ClientDefault,
}

impl fmt::Display for UrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlSource::Binding => write!(f, "resource binding"),
            UrlSource::Environment => write!(f, "environment"),
            UrlSource::ClientDefault => write!(f, "client default"),
        }
    }
}

/// Outcome of datasource URL resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    pub url: Option<String>,
    pub source: UrlSource,
}

impl ResolvedUrl {
    /// No explicit value from any source
    pub fn client_default() -> Self {
        Self {
            url: None,
            source: UrlSource::ClientDefault,
        }
    }

    pub fn is_explicit(&self) -> bool {
        self.url.is_some()
    }
}

/// Resolve the datasource URL from the binding, then `env_var` via `lookup`.
///
/// `lookup` is injected so callers (and tests) control the environment.
pub fn resolve_datasource_url<F>(
    binding: Option<&ResourceBinding>,
    env_var: &str,
    lookup: F,
) -> ResolvedUrl
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = binding.and_then(ResourceBinding::url) {
        return ResolvedUrl {
            url: Some(url.to_string()),
            source: UrlSource::Binding,
        };
    }

    if let Some(url) = non_empty(lookup(env_var)) {
        return ResolvedUrl {
            url: Some(url),
            source: UrlSource::Environment,
        };
    }

    ResolvedUrl::client_default()
}

/// [`resolve_datasource_url`] against the real process environment
pub fn resolve_from_process_env(binding: Option<&ResourceBinding>, env_var: &str) -> ResolvedUrl {
    resolve_datasource_url(binding, env_var, |name| std::env::var(name).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
