//! Redis-based cache implementation and pool lifecycle.

use super::CacheInterface;
use catalog_config::RedisConfig;
use catalog_core::{CatalogError, CatalogResult, HealthCheck, HealthStatus};
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Config, Pool, PoolConfig, Runtime, Timeouts};
use shaku::Component;
use std::cell::Cell;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Redis-based cache service.
///
/// Without a pool every operation is a no-op and lookups always miss.
#[derive(Component)]
#[shaku(interface = CacheInterface)]
pub struct RedisCacheService {
    pool: Option<Pool>,
}

impl RedisCacheService {
    /// Creates a cache service backed by `pool`.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool: Some(pool) }
    }

    /// Creates a no-op cache service (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    async fn get_conn(&self) -> CatalogResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool
                .get()
                .await
                .map_err(|e| CatalogError::Cache(format!("Failed to get Redis connection: {e}"))),
            None => Err(CatalogError::Cache("Cache is disabled".to_string())),
        }
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> CatalogResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CatalogError::Cache(format!("Failed to get key '{key}': {e}")))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> CatalogResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        match ttl {
            Some(ttl) => {
                let ttl_secs = ttl.as_secs().max(1);
                conn.set_ex::<_, _, ()>(key, value, ttl_secs)
                    .await
                    .map_err(|e| CatalogError::Cache(format!("Failed to set key '{key}': {e}")))?;
                debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
            }
            None => {
                conn.set::<_, _, ()>(key, value)
                    .await
                    .map_err(|e| CatalogError::Cache(format!("Failed to set key '{key}': {e}")))?;
                debug!("Cached key '{}' without expiry", key);
            }
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> CatalogResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| CatalogError::Cache(format!("Failed to delete key '{key}': {e}")))?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn exists(&self, key: &str) -> CatalogResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let exists: bool = conn
            .exists(key)
            .await
            .map_err(|e| CatalogError::Cache(format!("Failed to check key '{key}': {e}")))?;

        Ok(exists)
    }
}

#[async_trait]
impl HealthCheck for RedisCacheService {
    fn name(&self) -> &str {
        "redis"
    }

    async fn check(&self) -> HealthStatus {
        if !self.is_enabled() {
            return HealthStatus::Degraded("cache disabled".to_string());
        }

        let mut conn = match self.get_conn().await {
            Ok(conn) => conn,
            Err(e) => return HealthStatus::Unhealthy(e.to_string()),
        };
        let pong: Result<String, _> = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await;
        match pong {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(format!("PING failed: {e}")),
        }
    }
}

/// Builds the Redis connection pool described by `config`.
///
/// Returns `None` when Redis is disabled. No connection is opened here; see
/// [`warm_up`] for eager connections.
///
/// # Errors
///
/// Returns `CatalogError::Configuration` for an unusable host and
/// `CatalogError::Cache` if the pool cannot be built.
pub fn create_redis_pool(config: &RedisConfig) -> CatalogResult<Option<Pool>> {
    if !config.enabled {
        info!("Redis cache disabled");
        return Ok(None);
    }

    let url = config.connection_url().map_err(CatalogError::Configuration)?;
    let mut pool_config = Config::from_url(url);
    pool_config.pool = Some(PoolConfig {
        max_size: config.max_active,
        timeouts: Timeouts {
            wait: Some(config.wait_timeout()),
            create: Some(config.connect_timeout()),
            recycle: Some(config.connect_timeout()),
        },
        ..PoolConfig::default()
    });

    let pool = pool_config
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| CatalogError::Cache(format!("Failed to create Redis pool: {e}")))?;

    info!(
        host = %config.host,
        port = config.port,
        database = config.database,
        max_active = config.max_active,
        "Redis connection pool created"
    );
    Ok(Some(pool))
}

/// Opens `min_idle` connections and returns them to the pool as idle.
///
/// Each connection is checked with `PING`.
///
/// # Errors
///
/// Returns `CatalogError::Cache` if a connection cannot be opened.
pub async fn warm_up(pool: &Pool, min_idle: usize) -> CatalogResult<usize> {
    let mut held = Vec::with_capacity(min_idle);
    for _ in 0..min_idle {
        let mut conn = pool
            .get()
            .await
            .map_err(|e| CatalogError::Cache(format!("Failed to open Redis connection: {e}")))?;
        let _: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| CatalogError::Cache(format!("PING failed: {e}")))?;
        held.push(conn);
    }

    let warmed = held.len();
    drop(held);
    debug!("Warmed {} Redis connections", warmed);
    Ok(warmed)
}

/// Closes idle connections above `max_idle`. Returns how many were closed.
fn trim_idle(pool: &Pool, max_idle: usize) -> usize {
    let excess = pool.status().available.saturating_sub(max_idle);
    if excess == 0 {
        return 0;
    }

    let keep = evict_first(excess);
    pool.retain(|_, _| keep()).removed.len()
}

/// Predicate for `Pool::retain` that drops the first `count` connections.
fn evict_first(count: usize) -> impl Fn() -> bool {
    let left = Cell::new(count);
    move || match left.get() {
        0 => true,
        n => {
            left.set(n - 1);
            false
        }
    }
}

/// Spawns a background task that trims idle connections above `max_idle`
/// every `interval`.
///
/// Abort the returned handle on shutdown.
pub fn spawn_idle_reaper(pool: Pool, max_idle: usize, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting Redis idle reaper with max_idle={} every {:?}",
            max_idle, interval
        );

        loop {
            tokio::time::sleep(interval).await;

            let closed = trim_idle(&pool, max_idle);
            if closed > 0 {
                info!("Idle reaper closed {} Redis connections", closed);
            } else {
                debug!("Idle reaper: nothing to close");
            }
        }
    })
}
