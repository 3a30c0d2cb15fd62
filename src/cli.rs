use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use plugin_sdk::config::PartialOptions;

/// plugin-sdk - local development workflow for CMS plugin skins
#[derive(Parser, Debug)]
#[command(name = "plugin-sdk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output NDJSON events instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Color output
    #[arg(long, value_enum, global = true)]
    pub color: Option<ColorWhen>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// Selects and overrides the configuration to run with
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Name of the `[configs.<name>]` table to use
    #[arg(short, long)]
    pub config: Option<String>,

    /// Configuration file
    #[arg(long, default_value = "config.toml")]
    pub config_file: PathBuf,

    /// Commit changed files to svn (true/false)
    #[arg(long, value_name = "BOOL")]
    pub auto_commit: Option<bool>,

    /// Sync changed files to the remote server (true/false)
    #[arg(long, value_name = "BOOL")]
    pub sync_to_remote: Option<bool>,

    /// Notify the live-reload server (true/false)
    #[arg(long, value_name = "BOOL")]
    pub live_reload: Option<bool>,

    /// Skip files whose content did not change (true/false)
    #[arg(long, value_name = "BOOL")]
    pub check_file_changed: Option<bool>,

    /// Ticket reference prefixed to commit messages
    #[arg(long, alias = "jira")]
    pub ticket: Option<String>,
}

impl ConfigArgs {
    /// Command-line layer, applied on top of the config file and environment
    pub fn overrides(&self) -> PartialOptions {
        PartialOptions {
            auto_commit: self.auto_commit,
            sync_to_remote: self.sync_to_remote,
            live_reload: self.live_reload,
            check_file_changed: self.check_file_changed,
            ticket: self.ticket.clone(),
            ..PartialOptions::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build, then watch skin and plugin files and push changes
    Watch {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Pull remote core skins and compile the plugin skin
    Build {
        #[command(flatten)]
        config: ConfigArgs,

        /// Compile against the skins already pulled
        #[arg(long)]
        no_pull: bool,
    },

    /// Pull remote core (and theme) skins into the tmp directory
    Pull {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Delete the tmp directory
    Clean {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "plugin-sdk",
            "watch",
            "--config",
            "acme.stage",
            "--auto-commit",
            "false",
            "--jira",
            "PROJ-7",
        ])
        .unwrap();

        let Commands::Watch { config } = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(config.config.as_deref(), Some("acme.stage"));
        let overrides = config.overrides();
        assert_eq!(overrides.auto_commit, Some(false));
        assert_eq!(overrides.ticket.as_deref(), Some("PROJ-7"));
        assert_eq!(overrides.sync_to_remote, None);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["plugin-sdk", "build", "-c", "x", "--no-pull", "-vv", "--json"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Build { no_pull: true, .. }));
    }
}
