//! Tracing subscriber driven by the `[logging]` configuration section.
use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

use crate::config::LoggingConfig;

static LOG_FILTER: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();

/// Install the global subscriber at the configured level.
///
/// `RUST_LOG` takes precedence over `logging.level`. Returns `false` when a
/// global subscriber was already installed, in which case nothing changes.
pub fn init_tracing(logging: &LoggingConfig) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let (filter_layer, handle) = reload::Layer::new(filter);

    let installed = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_ok();
    if installed {
        let _ = LOG_FILTER.set(handle);
    }
    installed
}

/// Replace the active filter, e.g. after `logging.level` changed.
///
/// Returns `false` if the directive does not parse or tracing was not
/// installed through [`init_tracing`].
pub fn apply_logging_level(level: &str) -> bool {
    let (Some(handle), Ok(filter)) = (LOG_FILTER.get(), EnvFilter::try_new(level)) else {
        return false;
    };
    handle.reload(filter).is_ok()
}
