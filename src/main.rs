//! effect-sync CLI
//!
//! Dry-run planner for declarative video effect state.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use effect_sync::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("effect-sync v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(Commands::Plan { deltas }) => commands::plan(&deltas),
        Some(Commands::Replay { deltas }) => commands::replay(&deltas),
        Some(Commands::Defaults) => commands::defaults(),
        None => {
            println!("effect-sync v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}
