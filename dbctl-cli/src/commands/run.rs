//! Serve until a shutdown signal: start the connection, wait, stop it

use std::path::Path;

use anyhow::Result;
use dbctl_core::LifecycleHost;
use tracing::info;

use super::{ConnectArgs, Settings};
use crate::signal::shutdown_signal;

pub async fn run(config_path: Option<&Path>, args: ConnectArgs) -> Result<()> {
    let settings = Settings::assemble(config_path, &args)?;
    let manager = settings.build_manager()?;

    let mut host = LifecycleHost::new();
    host.register(manager);

    host.run_until(async {
        info!("Ready; press Ctrl+C to shut down");
        shutdown_signal().await;
    })
    .await
}
