use anyhow::{Context, Result};
use clap::Subcommand;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat, ResolvedConfig};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Initialize the global configuration file")]
    Init {
        #[arg(long, short = 'F', help = "Force overwrite existing config")]
        force: bool,
    },
    #[command(about = "Show current configuration")]
    Show,
    #[command(about = "Show configuration file paths")]
    Path,
}

pub async fn handle_config(
    cmd: ConfigCommand,
    resolved: &ResolvedConfig,
    format: OutputFormat,
) -> Result<()> {
    let formatter = get_formatter(format);

    match cmd {
        ConfigCommand::Init { force } => {
            let path = Config::init_global(force).context("failed to create global config")?;
            print!(
                "{}",
                formatter.format_message(&format!("Created global config at: {}", path.display()))
            );
        }
        ConfigCommand::Show => handle_show(resolved, format)?,
        ConfigCommand::Path => handle_path(resolved),
    }

    Ok(())
}

fn handle_show(resolved: &ResolvedConfig, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        let output = serde_json::json!({
            "config": resolved.config,
            "path": resolved.path,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match resolved.path {
        Some(ref path) => println!("# Loaded from: {}", path.display()),
        None => println!("# No config file found, using defaults"),
    }
    println!();
    print!("{}", toml::to_string_pretty(&resolved.config)?);
    Ok(())
}

fn handle_path(resolved: &ResolvedConfig) {
    let show = |label: &str, path: Option<std::path::PathBuf>| {
        if let Some(p) = path {
            let marker = if resolved.path.as_ref() == Some(&p) {
                " (active)"
            } else if p.exists() {
                ""
            } else {
                " (missing)"
            };
            println!("{label}: {}{marker}", p.display());
        }
    };

    show("Project", Config::project_path());
    show("Global", Config::global_path());
}
