//! Logging setup

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG`, defaulting to `info`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    init_with_default("info");
}

/// Same as [`init`] with a custom fallback directive
pub fn init_with_default(directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
