//! Diagnostic logging for the CLI.
//!
//! The library reports defaulted parameters and skipped operators through
//! `tracing`; this installs a stderr subscriber so they show up.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset, which is enough to see
/// data-integrity warnings from the evaluator.
///
/// # Example
/// ```bash
/// RUST_LOG=utility_bench=debug utility-cli estimate household.json
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
