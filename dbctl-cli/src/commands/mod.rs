//! Subcommands and the settings they share

pub mod check;
pub mod resolve;
pub mod run;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use dbctl_core::config::DatabaseSettings;
use dbctl_core::{
    resolve_from_process_env, ConnectionManager, DbctlConfig, LogCategory, ResolvedUrl,
    ResourceBinding,
};
use dbctl_pg::{PgClient, PoolSettings};
use tracing::debug;

/// Connection options shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectArgs {
    /// Resource binding JSON file ({"connectionString": "..."})
    #[arg(long, value_name = "PATH")]
    pub binding: Option<PathBuf>,

    /// Environment variable holding the fallback datasource URL
    #[arg(long, value_name = "NAME")]
    pub env_var: Option<String>,

    /// Query run after connecting to confirm the connection is usable
    #[arg(long, value_name = "SQL")]
    pub probe_query: Option<String>,

    /// Client log events to subscribe to (comma-separated: query,info,warn,error)
    #[arg(long, value_delimiter = ',')]
    pub log_events: Option<Vec<LogCategory>>,

    /// Maximum pool connections
    #[arg(long)]
    pub max_connections: Option<u32>,
}

/// File settings with command-line overrides applied
#[derive(Debug, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
}

impl Settings {
    /// Load `--config PATH` if given, else the layered TOML lookup, then apply flags
    pub fn assemble(config_path: Option<&Path>, args: &ConnectArgs) -> Result<Self> {
        let file = match config_path {
            Some(path) => DbctlConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => DbctlConfig::load(),
        };

        let mut database = file.database;
        if let Some(binding) = &args.binding {
            database.binding_file = Some(binding.clone());
        }
        if let Some(env_var) = &args.env_var {
            database.env_var = env_var.clone();
        }
        if let Some(probe) = &args.probe_query {
            database.probe_query = probe.clone();
        }
        if let Some(events) = &args.log_events {
            database.log_events = events.clone();
        }
        if let Some(max) = args.max_connections {
            database.max_connections = max;
        }

        debug!(?database, "Assembled database settings");
        Ok(Self { database })
    }

    /// Binding from the configured file, else from the platform environment
    pub fn load_binding(&self) -> Result<Option<ResourceBinding>> {
        match &self.database.binding_file {
            Some(path) => ResourceBinding::from_file(path)
                .map(Some)
                .context("Failed to load resource binding"),
            None => ResourceBinding::from_env().context("Failed to load resource binding"),
        }
    }

    pub fn resolve(&self) -> Result<ResolvedUrl> {
        let binding = self.load_binding()?;
        Ok(resolve_from_process_env(
            binding.as_ref(),
            &self.database.env_var,
        ))
    }

    /// Resolve the URL, construct the PostgreSQL client and wrap it
    pub fn build_manager(&self) -> Result<ConnectionManager<PgClient>> {
        let resolved = self.resolve()?;
        let pool = PoolSettings::from(&self.database);
        let manager = ConnectionManager::build(
            resolved,
            self.database.log_events.clone(),
            |config| PgClient::new(config, pool),
        )
        .context("Invalid database options")?;

        Ok(manager.with_probe_query(self.database.probe_query.clone()))
    }
}
