//! Shared tracing/logging setup for hosts embedding the engine.
//!
//! The engine crates only emit `tracing` events; installing a subscriber is
//! the host's call. This crate gives hosts the one standard way to do it.

use tracing_subscriber::EnvFilter;

/// Initialize process-wide tracing: JSON logs with timestamps, level
/// configurable via `RUST_LOG` (default `info`).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

/// Plain-text variant for local development and test harnesses.
pub fn init_pretty() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
