//! # Logging
//!
//! Installs the process-wide `tracing` subscriber. The filter comes from
//! `RUST_LOG` when set, then from the caller's configured directive, then `info`.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Initialize tracing with the default filter.
pub fn init_tracing() {
    init_tracing_with(None);
}

/// Initialize tracing, using `configured` when `RUST_LOG` is not set.
///
/// Only the first call in a process installs a subscriber; later calls are no-ops.
pub fn init_tracing_with(configured: Option<&str>) {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let filter = build_filter(configured);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .ok();
    });
}

fn build_filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        configured
            .and_then(|directive| EnvFilter::try_new(directive).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
    })
}
