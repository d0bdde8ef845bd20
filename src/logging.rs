//! Logging setup.
//!
//! The library only emits `tracing` events; hosts decide where they go.
//! These helpers install a `tracing-subscriber` fmt subscriber for binaries
//! and tests.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global fmt subscriber.
///
/// # Environment
/// - `RUST_LOG`: filter directive (default: `info`), e.g.
///   `RUST_LOG=u_emergency=debug`
///
/// Calling it more than once is harmless; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

/// Installs a debug-level subscriber that writes through the test harness.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
