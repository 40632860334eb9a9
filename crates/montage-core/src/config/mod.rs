//! Application configuration schemas.
//!
//! Configuration is deserialized from a TOML file via the `config` crate,
//! overlaid with `MONTAGE__`-prefixed environment variables. Each sub-module
//! is one configuration section.

pub mod logging;
pub mod storage;

use std::path::Path;

use serde::{Deserialize, Serialize};

use self::logging::LoggingConfig;
use self::storage::StorageConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// The file is optional; every field has a default. Environment
    /// variables use the `MONTAGE` prefix and `__` as the section
    /// separator, e.g. `MONTAGE__STORAGE__PROVIDER=s3`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        tracing::debug!(path, "Loading configuration");
        let config = config::Config::builder()
            .add_source(config::File::from(Path::new(path)).required(false))
            .add_source(
                config::Environment::with_prefix("MONTAGE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
