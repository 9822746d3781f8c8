use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::binding::{ResolvedUrl, DEFAULT_ENV_VAR};
use crate::error::ConfigError;

/// Probe query run right after a successful connect
pub const DEFAULT_PROBE_QUERY: &str = "SELECT 1 as ok";

/// Client log event categories a connection can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Query,
    Info,
    Warn,
    Error,
}

impl LogCategory {
    pub const ALL: [LogCategory; 4] = [
        LogCategory::Query,
        LogCategory::Info,
        LogCategory::Warn,
        LogCategory::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Query => "query",
            LogCategory::Info => "info",
            LogCategory::Warn => "warn",
            LogCategory::Error => "error",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogCategory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query" => Ok(LogCategory::Query),
            "info" => Ok(LogCategory::Info),
            "warn" | "warning" => Ok(LogCategory::Warn),
            "error" => Ok(LogCategory::Error),
            other => Err(ConfigError::LogCategory(other.to_string())),
        }
    }
}

/// What the underlying client is constructed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Explicit datasource URL; `None` leaves discovery to the client
    pub datasource_url: Option<String>,
    pub log_events: Vec<LogCategory>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            datasource_url: None,
            log_events: LogCategory::ALL.to_vec(),
        }
    }
}

impl ConnectionConfig {
    /// Build from a resolution result, omitting the override when nothing was resolved
    pub fn from_resolved(resolved: &ResolvedUrl) -> Self {
        Self {
            datasource_url: resolved.url.clone(),
            ..Self::default()
        }
    }

    pub fn with_log_events(mut self, events: Vec<LogCategory>) -> Self {
        self.log_events = events;
        self
    }

    pub fn logs(&self, category: LogCategory) -> bool {
        self.log_events.contains(&category)
    }
}

// ============================================================================
// .env loading
// ============================================================================

/// Get the dbctl config directory path (~/.dbctl)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".dbctl"))
}

/// Load environment variables from .env files
///
/// Priority order (highest to lowest):
/// 1. Environment variables already set
/// 2. Current directory .env
/// 3. ~/.dbctl/.env
///
/// dotenvy never overwrites a variable that is already set, so loading
/// in this order yields the priority above.
pub fn load_dotenv() -> Result<()> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(format!("current directory ({})", path.display()));
        debug!("Loaded .env from current directory: {}", path.display());
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(_) => {
                    loaded_from.push(format!("~/.dbctl/.env ({})", env_file.display()));
                    debug!("Loaded .env from ~/.dbctl: {}", env_file.display());
                }
                Err(e) => {
                    debug!("Failed to load ~/.dbctl/.env: {}", e);
                }
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found (current dir or ~/.dbctl)");
    } else {
        info!("Loaded configuration from: {}", loaded_from.join(", "));
    }

    Ok(())
}

// ============================================================================
// TOML Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DbctlConfig {
    #[serde(default)]
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Environment variable holding the fallback datasource URL
    #[serde(default = "default_env_var")]
    pub env_var: String,

    /// JSON resource binding file (`{"connectionString": ...}`)
    #[serde(default)]
    pub binding_file: Option<PathBuf>,

    #[serde(default = "default_log_events")]
    pub log_events: Vec<LogCategory>,

    #[serde(default = "default_probe_query")]
    pub probe_query: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Statements slower than this are reported when `warn` is subscribed
    #[serde(default = "default_slow_statement_ms")]
    pub slow_statement_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            env_var: default_env_var(),
            binding_file: None,
            log_events: default_log_events(),
            probe_query: default_probe_query(),
            max_connections: default_max_connections(),
            slow_statement_ms: default_slow_statement_ms(),
        }
    }
}

// Default value functions for serde
fn default_env_var() -> String {
    DEFAULT_ENV_VAR.to_string()
}

fn default_log_events() -> Vec<LogCategory> {
    LogCategory::ALL.to_vec()
}

fn default_probe_query() -> String {
    DEFAULT_PROBE_QUERY.to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_slow_statement_ms() -> u64 {
    1000
}

/// One TOML file as written: only the keys it actually sets
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigLayer {
    #[serde(default)]
    pub database: DatabaseLayer,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseLayer {
    pub env_var: Option<String>,
    pub binding_file: Option<PathBuf>,
    pub log_events: Option<Vec<LogCategory>>,
    pub probe_query: Option<String>,
    pub max_connections: Option<u32>,
    pub slow_statement_ms: Option<u64>,
}

impl ConfigLayer {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl DbctlConfig {
    /// Load config from TOML files
    ///
    /// Priority order (highest to lowest):
    /// 1. ./dbctl.toml (project-specific)
    /// 2. ~/.dbctl/config.toml (user defaults)
    /// 3. Built-in defaults
    pub fn load() -> Self {
        let global_path = config_dir().map(|d| d.join("config.toml"));
        Self::load_layered(global_path.as_deref(), Path::new("dbctl.toml"))
    }

    /// Fold the global then the local file over the defaults, key by key.
    ///
    /// Missing files are skipped; unreadable or malformed ones are warned about
    /// and skipped.
    pub fn load_layered(global_path: Option<&Path>, local_path: &Path) -> Self {
        let mut config = DbctlConfig::default();

        for path in global_path.into_iter().chain(std::iter::once(local_path)) {
            if !path.exists() {
                continue;
            }
            match ConfigLayer::from_file(path) {
                Ok(layer) => {
                    debug!("Loaded config from {}", path.display());
                    config = Self::merge(config, layer);
                }
                Err(e) => warn!("{}", e),
            }
        }

        config
    }

    /// Load a single TOML file; missing keys fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        ConfigLayer::from_file(path).map(|layer| Self::merge(Self::default(), layer))
    }

    /// Merge a layer over a config (layer overrides only the keys it sets)
    fn merge(mut base: Self, overlay: ConfigLayer) -> Self {
        let db = &mut base.database;
        let layer = overlay.database;

        if let Some(env_var) = layer.env_var {
            db.env_var = env_var;
        }
        if let Some(binding_file) = layer.binding_file {
            db.binding_file = Some(binding_file);
        }
        if let Some(log_events) = layer.log_events {
            db.log_events = log_events;
        }
        if let Some(probe_query) = layer.probe_query {
            db.probe_query = probe_query;
        }
        if let Some(max_connections) = layer.max_connections {
            db.max_connections = max_connections;
        }
        if let Some(slow_statement_ms) = layer.slow_statement_ms {
            db.slow_statement_ms = slow_statement_ms;
        }

        base
    }
}
