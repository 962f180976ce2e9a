use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Output goes to stderr so that
/// rendered search results on stdout stay clean.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
