//! Logging initialization

use tracing_subscriber::EnvFilter;

/// Install the process-wide JSON subscriber
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_target(false)
        .try_init();
}
