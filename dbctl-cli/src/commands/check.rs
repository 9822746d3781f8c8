//! One-shot connectivity check: start, then stop immediately

use std::path::Path;

use anyhow::{Context, Result};
use dbctl_core::LifecycleHost;

use super::{ConnectArgs, Settings};

pub async fn run(config_path: Option<&Path>, args: ConnectArgs) -> Result<()> {
    let settings = Settings::assemble(config_path, &args)?;
    let manager = settings.build_manager()?;

    let mut host = LifecycleHost::new();
    host.register(manager);
    host.run_until(async {})
        .await
        .context("Database check failed")?;

    println!("ok");
    Ok(())
}
