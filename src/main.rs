use anyhow::Result;
use clap::Parser;

use sitelab::cli::commands::{handle_config, handle_probe, handle_search, handle_serve};
use sitelab::cli::output::get_formatter;
use sitelab::cli::{Cli, Commands};
use sitelab::logging::init_tracing;
use sitelab::models::{Config, OutputFormat, ResolvedConfig};
use sitelab::server::shutdown_signal;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let resolved = match cli.command.resolve_config(Config::load()) {
        Ok(resolved) => resolved,
        Err(e) => exit_with_error(cli.format.unwrap_or_default(), &e.into()),
    };

    let level = if cli.verbose {
        "debug"
    } else {
        resolved.config.log.level.as_str()
    };
    init_tracing(level);

    let format = cli.format.unwrap_or(resolved.config.search.default_format);
    let verbose = cli.verbose;

    let result = match cli.command {
        // serve installs its own graceful shutdown
        Commands::Serve(args) => handle_serve(args, resolved.config, verbose).await,
        command => {
            tokio::select! {
                result = run_command(command, &resolved, format, verbose) => result,
                _ = shutdown_signal() => {
                    eprintln!("\nReceived shutdown signal, exiting...");
                    Ok(())
                }
            }
        }
    };

    if let Err(e) = result {
        exit_with_error(format, &e);
    }
}

fn exit_with_error(format: OutputFormat, error: &anyhow::Error) -> ! {
    let message = get_formatter(format).format_error(&format!("{error:#}"));
    eprintln!("{}", message.trim_end());
    std::process::exit(1);
}

async fn run_command(
    command: Commands,
    resolved: &ResolvedConfig,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    match command {
        Commands::Probe(args) => handle_probe(args, format, verbose).await?,
        Commands::Search(args) => handle_search(args, &resolved.config, format, verbose).await?,
        Commands::Config(cmd) => handle_config(cmd, resolved, format).await?,
        Commands::Serve(args) => handle_serve(args, resolved.config.clone(), verbose).await?,
    }

    Ok(())
}
