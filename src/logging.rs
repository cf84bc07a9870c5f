//! Log output for the command-line tool
//!
//! Library code only emits `tracing` events; the binary decides where they go.

use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` when set, else `level`, else `warn`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install a stderr subscriber. Safe to call more than once.
pub fn init(level: &str, verbose: bool) {
    let filter = if verbose { EnvFilter::new("debug") } else { env_filter(level) };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
