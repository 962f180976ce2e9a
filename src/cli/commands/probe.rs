use anyhow::Result;
use clap::Args;

use crate::cli::output::{ProbeReport, get_formatter};
use crate::models::OutputFormat;
use crate::services::classify;
use crate::utils::trim_browser;

#[derive(Debug, Args)]
pub struct ProbeArgs {
    #[arg(required = true, help = "Message to send to the assistant")]
    pub message: String,
}

pub fn build_report(message: &str) -> ProbeReport {
    let trimmed = trim_browser(message);
    let probe = classify(&trimmed.to_lowercase());
    ProbeReport {
        message: trimmed.to_string(),
        probe,
        leaked: probe.leaks(),
        response: probe.response().to_string(),
    }
}

pub async fn handle_probe(args: ProbeArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let report = build_report(&args.message);

    if verbose {
        eprintln!("Message: \"{}\"", report.message);
        eprintln!("  Injection probe: {}", report.probe.is_injection());
    }

    print!("{}", get_formatter(format).format_probe(&report));
    Ok(())
}
