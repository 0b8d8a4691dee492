//! Product cache policy.

use catalog_config::CacheConfig;
use std::time::Duration;

/// Controls how product writes and misses interact with the cache.
///
/// The default writes to the cache on insert only. Entries are never
/// refreshed by reads, never invalidated by writes and never expire, so an
/// entry can go stale after an update or delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
    /// Remove the cached entry after a successful update or delete.
    pub invalidate_on_write: bool,
    /// Store the result of a cache miss.
    pub populate_on_read: bool,
    /// Lifetime of written entries. `None` keeps them until evicted.
    pub ttl: Option<Duration>,
}

impl From<&CacheConfig> for CachePolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            invalidate_on_write: config.invalidate_on_write,
            populate_on_read: config.populate_on_read,
            ttl: config.ttl(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_matches_default_config() {
        assert_eq!(CachePolicy::from(&CacheConfig::default()), CachePolicy::default());
    }

    #[test]
    fn test_policy_from_config() {
        let config = CacheConfig {
            invalidate_on_write: true,
            populate_on_read: true,
            ttl_secs: Some(120),
        };
        let policy = CachePolicy::from(&config);
        assert!(policy.invalidate_on_write);
        assert!(policy.populate_on_read);
        assert_eq!(policy.ttl, Some(Duration::from_secs(120)));
    }
}
