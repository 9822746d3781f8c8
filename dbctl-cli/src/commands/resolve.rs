//! Print where the datasource URL comes from, without connecting

use std::path::Path;

use anyhow::Result;
use dbctl_core::redact_url;

use super::{ConnectArgs, Settings};

pub fn run(config_path: Option<&Path>, args: ConnectArgs) -> Result<()> {
    let settings = Settings::assemble(config_path, &args)?;
    let resolved = settings.resolve()?;

    println!("source: {}", resolved.source);
    match &resolved.url {
        Some(url) => println!("url: {}", redact_url(url)),
        None => println!("url: <client default>"),
    }
    Ok(())
}
