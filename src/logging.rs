use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber with env-based filtering.
///
/// Reads `RUST_LOG` to set the filter. Without it, `--verbose` logs at
/// `debug` and everything else at `warn`. Output goes to stderr so it never
/// mixes with JSON or TSV on stdout.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
