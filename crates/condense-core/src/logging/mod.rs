//! Logging setup built on `tracing`.
//!
//! Library crates only emit events; the binary installs the subscriber once
//! via [`init_subscriber`]. Output goes to stderr so stdout stays clean for
//! JSONL and JSON results.

pub mod test_utils;

pub use test_utils::{CapturedEvent, CapturedLogs, capture_logs};

/// Map CLI verbosity to a filter directive.
///
/// `quiet` wins over any number of `-v` flags. Without flags the level
/// falls back to `default`.
pub fn level_for_verbosity(verbose: u8, quiet: bool, default: &str) -> String {
    if quiet {
        return "error".to_owned();
    }
    match verbose {
        0 => default.to_owned(),
        1 => "info".to_owned(),
        2 => "debug".to_owned(),
        _ => "trace".to_owned(),
    }
}

/// Initialize the global tracing subscriber with stderr output.
///
/// Call once at application startup. Subsequent calls are no-ops.
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_subscriber(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    let _ = subscriber.try_init();
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
