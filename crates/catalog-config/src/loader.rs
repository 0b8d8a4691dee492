//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use catalog_core::CatalogError;
use config::{Config, ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable prefix for overrides, e.g. `CATALOG_REDIS__HOST`.
pub const ENV_PREFIX: &str = "CATALOG";

/// Loads [`AppConfig`] from layered sources.
///
/// Sources are applied in order, later ones winning:
/// 1. `{dir}/default.toml`
/// 2. `{dir}/{environment}.toml`
/// 3. `{dir}/local.toml` (not committed to version control)
/// 4. Environment variables with the `CATALOG_` prefix and `__` as the
///    nesting separator
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    environment: String,
    read_env: bool,
}

impl ConfigLoader {
    /// Creates a loader for the given directory.
    ///
    /// The environment name comes from `CATALOG_ENVIRONMENT` and defaults to
    /// `development`.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        let environment = std::env::var(format!("{ENV_PREFIX}_ENVIRONMENT"))
            .unwrap_or_else(|_| "development".to_string());
        Self {
            config_dir: config_dir.into(),
            environment,
            read_env: true,
        }
    }

    /// Creates a loader for `./config`.
    #[must_use]
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Overrides the environment name.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Skips `.env` and process environment variables; files only.
    #[must_use]
    pub const fn files_only(mut self) -> Self {
        self.read_env = false;
        self
    }

    /// Returns the selected environment name.
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Loads and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Configuration` when a source cannot be parsed or
    /// validation finds any problem. All validation problems are reported
    /// together.
    pub fn load(&self) -> Result<AppConfig, CatalogError> {
        if self.read_env {
            if let Err(e) = dotenvy::dotenv() {
                debug!("No .env file loaded: {}", e);
            }
        }

        info!(
            environment = %self.environment,
            dir = %self.config_dir.display(),
            "Loading configuration"
        );

        let mut builder = Config::builder();
        for name in ["default", self.environment.as_str(), "local"] {
            let path = self.config_dir.join(format!("{name}.toml"));
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        if self.read_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error_to_catalog_error)?;

        ConfigValidator::validate(&app_config)
            .map_err(|errors| CatalogError::Configuration(format_validation_errors(&errors)))?;

        Ok(app_config)
    }
}

fn config_error_to_catalog_error(err: ConfigError) -> CatalogError {
    CatalogError::Configuration(err.to_string())
}
