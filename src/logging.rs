//! Diagnostic logging setup for the command-line tool.

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "scriptmap=warn";
const VERBOSE_LOG_FILTER: &str = "scriptmap=debug";

/// Pick the log filter; `RUST_LOG` wins over `--verbose`.
fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        })
    })
}

/// Install a stderr subscriber. Later calls are no-ops.
pub fn init_logging(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
