//! plugin-sdk CLI - local development workflow for CMS plugin skins
//!
//! Usage: plugin-sdk <COMMAND> --config <NAME>
//!
//! Commands:
//!   watch   Build, then watch skin and plugin files and push changes
//!   build   Pull remote core skins and compile the plugin skin
//!   pull    Pull remote core (and theme) skins
//!   clean   Delete the tmp directory

mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use ui::context::UiContext;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ui = UiContext::new(cli.json, cli.verbose, cli.color);

    match &cli.command {
        Commands::Watch { config } => commands::watch::cmd_watch(config, &ui),
        Commands::Build { config, no_pull } => commands::build::cmd_build(config, *no_pull, &ui),
        Commands::Pull { config } => commands::pull::cmd_pull(config, &ui),
        Commands::Clean { config } => commands::clean::cmd_clean(config, &ui),
    }
}

/// Diagnostics go to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "plugin_sdk=debug",
        _ => "plugin_sdk=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
