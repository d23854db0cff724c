//! Logging setup
//!
//! One tracing-subscriber registration at process start. Everything after
//! this is plain `tracing` macros throughout the crate.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging for the extractor process.
///
/// `RUST_LOG` takes precedence when set. The fallback scopes the default
/// level to this crate so dependency internals stay quiet during runs.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ledger_extractor={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
