//! Dependency injection module using Shaku.
//!
//! `CatalogModule` wires the whole process: database pool, MySQL
//! repositories, the Redis cache and both services.

use catalog_core::{module, HasComponent};
use catalog_repository::{
    DatabasePool, DatabasePoolInterface, DatabasePoolParameters, MySqlCategoryRepository,
    MySqlProductRepository,
};
use catalog_service::{
    CacheInterface, CachePolicy, CategoryService, CategoryServiceComponent, ProductService,
    ProductServiceComponent, ProductServiceComponentParameters, RedisCacheService,
    RedisCacheServiceParameters,
};
use deadpool_redis::Pool;
use sqlx::MySqlPool;
use std::sync::Arc;

module! {
    pub CatalogModule {
        components = [
            DatabasePool,
            MySqlProductRepository,
            MySqlCategoryRepository,
            RedisCacheService,
            ProductServiceComponent,
            CategoryServiceComponent,
        ],
        providers = [],
    }
}

/// Collects the runtime resources `CatalogModule` needs.
#[derive(Default)]
pub struct CatalogModuleBuilder {
    db_pool: Option<MySqlPool>,
    redis_pool: Option<Pool>,
    policy: CachePolicy,
}

impl CatalogModuleBuilder {
    /// Creates an empty builder. The cache starts disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the MySQL pool.
    #[must_use]
    pub fn with_database_pool(mut self, pool: MySqlPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Sets the Redis pool. `None` leaves the cache disabled.
    #[must_use]
    pub fn with_redis_pool(mut self, pool: Option<Pool>) -> Self {
        self.redis_pool = pool;
        self
    }

    /// Sets the product cache policy.
    #[must_use]
    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builds the module.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Configuration` when no database pool was given.
    pub fn build(self) -> catalog_core::CatalogResult<Arc<CatalogModule>> {
        let pool = self.db_pool.ok_or_else(|| {
            catalog_core::CatalogError::Configuration(
                "a database pool is required to build the module".to_string(),
            )
        })?;

        let module = CatalogModule::builder()
            .with_component_parameters::<DatabasePool>(DatabasePoolParameters { pool })
            .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters {
                pool: self.redis_pool,
            })
            .with_component_parameters::<ProductServiceComponent>(
                ProductServiceComponentParameters {
                    policy: self.policy,
                },
            )
            .build();

        Ok(Arc::new(module))
    }
}

/// Resolves the components the bootstrap needs from a module.
pub trait CatalogResolver {
    /// Resolves the product service.
    fn product_service(&self) -> Arc<dyn ProductService>;

    /// Resolves the category service.
    fn category_service(&self) -> Arc<dyn CategoryService>;

    /// Resolves the database pool.
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;

    /// Resolves the cache.
    fn cache(&self) -> Arc<dyn CacheInterface>;
}

impl CatalogResolver for CatalogModule {
    fn product_service(&self) -> Arc<dyn ProductService> {
        self.resolve()
    }

    fn category_service(&self) -> Arc<dyn CategoryService> {
        self.resolve()
    }

    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }

    fn cache(&self) -> Arc<dyn CacheInterface> {
        self.resolve()
    }
}
