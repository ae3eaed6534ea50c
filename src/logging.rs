//! Process-wide tracing setup shared by both binaries.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "taskboard_api=debug,tower_http=info";

/// Install the fmt subscriber, filtered by `RUST_LOG` when set.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

/// Same as [`init`] with a caller-chosen fallback filter.
pub fn init_with_default(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
