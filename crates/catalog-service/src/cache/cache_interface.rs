//! Cache interface trait.

use catalog_core::CatalogResult;
use async_trait::async_trait;
use shaku::Interface;
use std::time::Duration;

/// String-keyed cache of serialized values.
///
/// Implementations report connectivity problems as `CatalogError::Cache`;
/// callers decide whether such an error is fatal.
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Gets a raw value. Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> CatalogResult<Option<String>>;

    /// Sets a raw value, overwriting any existing one.
    ///
    /// With `ttl` of `None` the entry never expires.
    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> CatalogResult<()>;

    /// Deletes a value. Returns `true` if the key existed.
    async fn delete(&self, key: &str) -> CatalogResult<bool>;

    /// Checks if a key exists.
    async fn exists(&self, key: &str) -> CatalogResult<bool>;

    /// Checks if caching is enabled.
    fn is_enabled(&self) -> bool;
}
