use anyhow::{Context, Result};
use clap::Args;

use crate::models::Config;
use crate::server::run_server;

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, help = "Address to bind (overrides config)")]
    pub host: Option<String>,

    #[arg(long, short = 'p', help = "Port to listen on (overrides config)")]
    pub port: Option<u16>,

    #[arg(long, help = "Minimum simulated latency in milliseconds")]
    pub min_latency_ms: Option<u64>,

    #[arg(long, help = "Maximum simulated latency in milliseconds (exclusive)")]
    pub max_latency_ms: Option<u64>,
}

impl ServeArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(min) = self.min_latency_ms {
            config.chat.min_latency_ms = min;
        }
        if let Some(max) = self.max_latency_ms {
            config.chat.max_latency_ms = max;
        }
    }
}

pub async fn handle_serve(args: ServeArgs, mut config: Config, verbose: bool) -> Result<()> {
    args.apply(&mut config);
    config.validate()?;

    if verbose {
        eprintln!("Bind: {}", config.server.bind_addr());
        eprintln!("  Path: {}", config.server.chat_path);
        eprintln!(
            "  Latency: {}..{}ms",
            config.chat.min_latency_ms, config.chat.max_latency_ms
        );
    }

    run_server(&config).await.context("mock chat API failed")
}
