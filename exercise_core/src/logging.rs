//! Tracing setup shared by the exdedup binary and the unit tests.
//!
//! Every command prints its result as JSON on stdout, so log output always
//! goes to stderr and never interleaves with the payload.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging at `warn`
///
/// Per-run summaries are logged at `info` and merge decisions at `debug`;
/// set `RUST_LOG=exercise_core=debug` to see why records were collapsed.
pub fn init() {
    init_with_level("warn")
}

/// Initialize logging with a default filter directive
///
/// `RUST_LOG`, when set, takes precedence over `default_level`.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Route debug-level logs into the test harness output
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
