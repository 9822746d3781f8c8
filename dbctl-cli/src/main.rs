//! dbctl CLI - database connection lifecycle host
//!
//! Resolves the datasource URL (resource binding, then environment, then
//! client defaults), opens the connection on boot, probes it, and closes it
//! on graceful shutdown.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod signal;
mod tracing_setup;

use commands::ConnectArgs;

#[derive(Parser, Debug)]
#[command(
    name = "dbctl",
    author,
    version,
    about = "Database connection lifecycle manager",
    long_about = "Open a database connection at startup, verify it with a probe query, \
                  and close it on shutdown. The datasource URL comes from a resource \
                  binding, then DATABASE_URL, then the client's own defaults."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Read settings from this TOML file instead of ./dbctl.toml and ~/.dbctl/config.toml
    #[arg(long, global = true, value_name = "PATH", env = "DBCTL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Connect, then hold the connection until Ctrl+C or SIGTERM
    Run(ConnectArgs),
    /// Connect, probe and disconnect once; exits non-zero if the connect fails
    Check(ConnectArgs),
    /// Show the resolved datasource URL (credentials redacted) without connecting
    Resolve(ConnectArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();
    dbctl_core::config::load_dotenv()?;

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Run(args) => commands::run::run(config, args).await?,
        Commands::Check(args) => commands::check::run(config, args).await?,
        Commands::Resolve(args) => commands::resolve::run(config, args)?,
        Commands::Completions(args) => run_completions(args)?,
    }

    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
