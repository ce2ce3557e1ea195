//! Tracing subscriber setup for the `aoi-query` binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATE_TARGET: &str = "aoi_query";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human output without targets.
    Compact,
    /// JSON lines on stdout, for hosts that collect structured logs.
    Json,
}

/// Directives used when `RUST_LOG` is unset. Verbose mode raises this crate
/// to debug while dependencies stay at info.
pub fn default_directives(verbose: bool) -> String {
    if verbose {
        format!("{}=debug,info", CRATE_TARGET)
    } else {
        format!("{}=info", CRATE_TARGET)
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

pub fn init_logger(format: LogFormat, verbose: bool) {
    let registry = tracing_subscriber::registry().with(env_filter(verbose));
    let fmt = tracing_subscriber::fmt::layer()
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Compact => registry.with(fmt.with_target(false).compact()).init(),
        LogFormat::Json => registry.with(fmt.with_target(true).json()).init(),
    }
}
