//! CLI module for sitelab.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::error::ConfigError;
use crate::models::{OutputFormat, ResolvedConfig};

/// Static-site search and a prompt-injection training chat mock.
#[derive(Debug, Parser)]
#[command(name = "sitelab")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(
        long,
        short = 'f',
        global = true,
        help = "Output format: text, json, markdown, or html"
    )]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the mock chat completions API
    Serve(commands::ServeArgs),

    /// Send one message through the response generator locally
    Probe(commands::ProbeArgs),

    /// Filter the site search index
    Search(commands::SearchArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::ConfigCommand),
}

impl Commands {
    /// `config path` and `config init` must work while the config file is broken.
    pub fn runs_without_config(&self) -> bool {
        matches!(
            self,
            Commands::Config(commands::ConfigCommand::Path | commands::ConfigCommand::Init { .. })
        )
    }

    /// Fall back to defaults when the command does not depend on the loaded config.
    pub fn resolve_config(
        &self,
        loaded: Result<ResolvedConfig, ConfigError>,
    ) -> Result<ResolvedConfig, ConfigError> {
        match loaded {
            Err(e) if self.runs_without_config() => {
                eprintln!("Warning: ignoring invalid config: {e}");
                Ok(ResolvedConfig::default())
            }
            other => other,
        }
    }
}

// FromStr is implemented in models::search

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Config;

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(args).unwrap().command
    }

    fn broken() -> Result<ResolvedConfig, ConfigError> {
        Config::from_toml("[server]\nport = \"not a number\"\n").map(|config| ResolvedConfig {
            config,
            path: None,
        })
    }

    #[test]
    fn test_config_repair_commands_ignore_broken_config() {
        for args in [
            &["sitelab", "config", "path"][..],
            &["sitelab", "config", "init", "--force"][..],
        ] {
            let resolved = parse(args).resolve_config(broken()).unwrap();
            assert_eq!(resolved.path, None);
            assert_eq!(resolved.config.server.port, Config::default().server.port);
        }
    }

    #[test]
    fn test_other_commands_surface_config_errors() {
        for args in [
            &["sitelab", "config", "show"][..],
            &["sitelab", "search", "rust"][..],
            &["sitelab", "probe", "hello"][..],
        ] {
            assert!(parse(args).resolve_config(broken()).is_err());
        }
    }
}
