//! Tracing subscriber setup.
//!
//! The crate only emits `tracing` events; hosts that already install a subscriber can skip this.

use tracing_subscriber::EnvFilter;

use crate::config::PreviewConfig;

/// Fallback directive when neither the config nor `RUST_LOG` names one.
pub const DEFAULT_LOG_FILTER: &str = "embed_preview=info";

/// Installs a global fmt subscriber. Returns `false` if a subscriber was already installed.
pub fn init_tracing(config: &PreviewConfig) -> bool {
    let filter = match config.log_filter.as_deref() {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
