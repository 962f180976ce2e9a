use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::cli::output::{Formatter, get_formatter};
use crate::models::{Config, OutputFormat, SearchResults};
use crate::services::{IndexLoader, IndexSource, SearchSession};

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(
        required_unless_present = "interactive",
        help = "Search query text"
    )]
    pub query: Option<String>,

    #[arg(long, short = 'i', help = "Index file path or URL (overrides config)")]
    pub index: Option<String>,

    #[arg(long, short = 'n', help = "Maximum number of results to show")]
    pub limit: Option<usize>,

    #[arg(
        long,
        conflicts_with = "query",
        help = "Read one query per line from stdin and re-render on each"
    )]
    pub interactive: bool,
}

pub async fn handle_search(
    args: SearchArgs,
    config: &Config,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let limit = args.limit.unwrap_or(config.search.max_results);
    if limit == 0 {
        anyhow::bail!("limit must be at least 1");
    }

    let source = IndexSource::parse(args.index.as_deref().unwrap_or(&config.search.index));
    if verbose {
        eprintln!("Index: {source}");
        eprintln!("  Limit: {limit}");
    }

    let load_start = Instant::now();
    let documents = IndexLoader::new()?
        .load(&source)
        .await
        .with_context(|| format!("failed to load search index from {source}"))?;
    if verbose {
        eprintln!(
            "Loaded {} documents in {}ms",
            documents.len(),
            load_start.elapsed().as_millis()
        );
    }

    let session = SearchSession::new(documents).with_limits(config.search.min_query_len, limit);
    let formatter = get_formatter(format);

    if args.interactive {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        return run_interactive(&session, stdin, &mut stdout, formatter.as_ref()).await;
    }

    let query = args.query.unwrap_or_default();
    print!("{}", render(&session, &query, formatter.as_ref()));
    Ok(())
}

/// Filter and format one query.
pub fn render(session: &SearchSession, query: &str, formatter: &dyn Formatter) -> String {
    let start = Instant::now();
    let view = session.on_input(query);
    let duration_us = start.elapsed().as_micros() as u64;
    formatter.format_search_results(&SearchResults::new(query, view, duration_us))
}

/// Treat each input line as the new contents of the search box.
pub async fn run_interactive<R, W>(
    session: &SearchSession,
    reader: R,
    writer: &mut W,
    formatter: &dyn Formatter,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        write!(writer, "{}", render(session, &line, formatter))?;
        writer.flush()?;
    }
    Ok(())
}
