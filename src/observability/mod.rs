//! Structured logging setup.
//!
//! Logs go to stderr so that reports written to stdout stay machine-readable.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "mcpscan=info";

/// Filter used for `--verbose` when `RUST_LOG` is not set.
const VERBOSE_FILTER: &str = "mcpscan=debug";

/// Initialize structured logging with `RUST_LOG` environment variable support.
///
/// `RUST_LOG` always wins; otherwise `verbose` picks between the info and
/// debug defaults. Call once at program startup. Subsequent calls are
/// silently ignored by `tracing_subscriber`.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // try_init so double-init in tests doesn't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}
