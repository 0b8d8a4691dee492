//! Configuration validation.
//!
//! Every check runs and every problem is collected, so a misconfigured
//! deployment fails once at startup with the full list.

use crate::{AppConfig, CacheConfig, DatabaseConfig, RedisConfig};
use catalog_core::telemetry::ObservabilityConfig;
use std::fmt::Write as _;
use thiserror::Error;
use url::Url;

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    /// Port number is invalid.
    #[error("Invalid port for {name}: {value} (must be 1-65535)")]
    InvalidPort { name: String, value: u16 },

    /// A required value is empty.
    #[error("{name} cannot be empty")]
    Empty { name: String },

    /// Minimum pool size exceeds the maximum.
    #[error("Invalid pool size for {name}: min ({min}) cannot be greater than max ({max})")]
    InvalidPoolSize { name: String, min: usize, max: usize },

    /// Pool size exceeds the allowed ceiling.
    #[error("Pool size {value} for {name} exceeds maximum allowed ({maximum})")]
    PoolSizeTooLarge { name: String, value: usize, maximum: usize },

    /// Redis idle bounds are inconsistent.
    #[error(
        "Invalid redis pool bounds: expected min_idle ({min_idle}) <= max_idle ({max_idle}) <= max_active ({max_active})"
    )]
    InvalidIdleBounds {
        min_idle: usize,
        max_idle: usize,
        max_active: usize,
    },

    /// URL format is invalid.
    #[error("Invalid {url_type} URL: {message}")]
    InvalidUrl { url_type: String, message: String },

    /// Timeout value must be positive.
    #[error("Timeout '{name}' must be positive, got {value}")]
    NonPositiveTimeout { name: String, value: u64 },

    /// Log level is invalid.
    #[error("Invalid log level: '{value}' (valid: trace, debug, info, warn, error)")]
    InvalidLogLevel { value: String },
}

/// Validates an [`AppConfig`].
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: usize = 1000;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the whole configuration.
    ///
    /// # Errors
    ///
    /// Returns every problem found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_database(&config.database, &mut errors);
        Self::validate_redis(&config.redis, &mut errors);
        Self::validate_cache(&config.cache, &mut errors);
        Self::validate_observability(&config.observability, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_database(config: &DatabaseConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.url.is_empty() {
            errors.push(ConfigValidationError::Empty {
                name: "database.url".to_string(),
            });
        } else {
            match Url::parse(&config.url) {
                Ok(url) if url.scheme() == "mysql" => {}
                Ok(url) => errors.push(ConfigValidationError::InvalidUrl {
                    url_type: "database".to_string(),
                    message: format!("unsupported scheme '{}', expected mysql://", url.scheme()),
                }),
                Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                    url_type: "database".to_string(),
                    message: e.to_string(),
                }),
            }
        }

        let (min, max) = (
            config.min_connections as usize,
            config.max_connections as usize,
        );
        if min > max {
            errors.push(ConfigValidationError::InvalidPoolSize {
                name: "database".to_string(),
                min,
                max,
            });
        }
        if max > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                name: "database".to_string(),
                value: max,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        if config.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.connect_timeout_secs".to_string(),
                value: 0,
            });
        }
    }

    fn validate_redis(config: &RedisConfig, errors: &mut Vec<ConfigValidationError>) {
        if !config.enabled {
            return;
        }

        if config.host.trim().is_empty() {
            errors.push(ConfigValidationError::Empty {
                name: "redis.host".to_string(),
            });
        } else if let Err(message) = config.connection_url() {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message,
            });
        }

        if config.port == 0 {
            errors.push(ConfigValidationError::InvalidPort {
                name: "redis.port".to_string(),
                value: 0,
            });
        }

        if config.max_active == 0 {
            errors.push(ConfigValidationError::InvalidPoolSize {
                name: "redis".to_string(),
                min: 1,
                max: 0,
            });
        }
        if config.max_active > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                name: "redis".to_string(),
                value: config.max_active,
                maximum: Self::MAX_POOL_SIZE,
            });
        }
        if config.min_idle > config.max_idle || config.max_idle > config.max_active {
            errors.push(ConfigValidationError::InvalidIdleBounds {
                min_idle: config.min_idle,
                max_idle: config.max_idle,
                max_active: config.max_active,
            });
        }

        if config.wait_timeout_ms == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "redis.wait_timeout_ms".to_string(),
                value: 0,
            });
        }
        if config.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "redis.connect_timeout_secs".to_string(),
                value: 0,
            });
        }
        if config.reap_interval_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "redis.reap_interval_secs".to_string(),
                value: 0,
            });
        }
    }

    fn validate_cache(config: &CacheConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.ttl_secs == Some(0) {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "cache.ttl_secs".to_string(),
                value: 0,
            });
        }
    }

    fn validate_observability(
        config: &ObservabilityConfig,
        errors: &mut Vec<ConfigValidationError>,
    ) {
        let level = config.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }
    }
}

/// Formats validation errors for display.
#[must_use]
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        let _ = writeln!(output, "  {}. {}", i + 1, error);
    }
    output
}
