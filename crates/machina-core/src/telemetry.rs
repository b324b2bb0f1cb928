//! Tracing initialisation.
//!
//! Libraries in this workspace only emit `tracing` events; binaries and test
//! harnesses call [`init_tracing`] once to install a subscriber.

use crate::DaoResult;
use serde::{Deserialize, Serialize};

#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,

    /// Whether to install a subscriber at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_level() -> String {
    "info,machina=debug".to_string()
}

fn default_enabled() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            enabled: default_enabled(),
        }
    }
}

/// Installs a global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over [`LoggingConfig::level`]. Fails with a
/// configuration error if a subscriber is already installed.
#[cfg(feature = "telemetry")]
pub fn init_tracing(config: &LoggingConfig) -> DaoResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    result.map_err(|e| crate::DaoError::Configuration(format!("Failed to install tracing subscriber: {e}")))?;

    tracing::info!(level = %config.level, json = config.json, "Tracing initialized");
    Ok(())
}

/// Placeholder for when the telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_tracing(_config: &LoggingConfig) -> DaoResult<()> {
    Ok(())
}
