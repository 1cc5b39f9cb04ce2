//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the configured level when it is set. Installing a
//! second global subscriber is an error, so callers should initialise once
//! at startup.

use cadence_domain::{CadenceError, LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Install the global subscriber described by `config`.
///
/// # Errors
/// Returns `CadenceError::Config` if the level directive is invalid or a
/// global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(&config.level)?;
    let registry = Registry::default().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json().with_current_span(false)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    installed.map_err(|e| CadenceError::Config(format!("failed to install subscriber: {e}")))?;

    tracing::debug!(level = %config.level, json = config.json, "tracing initialised");
    Ok(())
}

/// Filter from `RUST_LOG`, or from `level` when the variable is unset.
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .map_err(|e| CadenceError::Config(format!("invalid log level '{level}': {e}")))
}
