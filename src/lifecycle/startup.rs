//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging and metrics
//! - Load the site store
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - The listener binds last (traffic only when ready)

use std::path::Path;

use thiserror::Error;

use crate::config::loader::{resolve_config, ConfigError};
use crate::config::SiteConfig;
use crate::observability::logging::{init_logging, LoggingError};
use crate::observability::metrics;
use crate::sites::SiteStore;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("failed to load site snapshot from {path}: {source}")]
    Store {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Config from `path` (or `WEDSITE_CONFIG`) plus the process environment.
pub fn load_configuration(path: Option<&Path>) -> Result<SiteConfig, StartupError> {
    let env_path = std::env::var_os("WEDSITE_CONFIG").map(std::path::PathBuf::from);
    let path = path.or(env_path.as_deref());
    Ok(resolve_config(path, std::env::vars())?)
}

/// Logging first, then the optional metrics exporter.
pub fn init_observability(config: &SiteConfig) -> Result<(), StartupError> {
    init_logging(&config.observability)?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }
    Ok(())
}

/// The persisted store when a data path is configured, else an empty one.
pub fn load_store(config: &SiteConfig) -> Result<SiteStore, StartupError> {
    match crate::config::schema::non_empty(config.storage.data_path.as_deref()) {
        Some(path) => SiteStore::load_from_file(path).map_err(|source| StartupError::Store {
            path: path.to_string(),
            source,
        }),
        None => Ok(SiteStore::new(None)),
    }
}
