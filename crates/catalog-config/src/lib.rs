//! # Catalog Config
//!
//! Layered configuration for the catalog backend: TOML files, an optional
//! `.env` file, then `CATALOG_`-prefixed environment variables. Everything is
//! validated once at startup.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;

pub use catalog_core::telemetry::{LogFormat, ObservabilityConfig};
