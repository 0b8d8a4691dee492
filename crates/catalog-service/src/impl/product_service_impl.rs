//! Product service implementation.

use crate::cache::{cache_keys, decode_product, encode_product, CacheInterface, CachePolicy};
use crate::dto::{ProductDto, ProductRequest};
use crate::mappers;
use crate::product_service::ProductService;
use catalog_core::{
    CatalogError, CatalogResult, Category, CategoryId, Page, PageRequest, ProductId, ValidateExt,
};
use catalog_repository::{CategoryRepository, ProductRepository};
use async_trait::async_trait;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Product service component for Shaku DI.
///
/// Reads are cache-aside: a hit is returned without touching the store, a
/// miss (or an unreachable cache, or an unreadable payload) falls back to the
/// store. Inserts always write the new product to the cache. Everything else
/// follows the [`CachePolicy`].
#[derive(Component)]
#[shaku(interface = ProductService)]
pub struct ProductServiceComponent {
    #[shaku(inject)]
    product_repository: Arc<dyn ProductRepository>,
    #[shaku(inject)]
    category_repository: Arc<dyn CategoryRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    policy: CachePolicy,
}

impl ProductServiceComponent {
    /// Creates a product service without a DI module.
    #[must_use]
    pub fn new(
        product_repository: Arc<dyn ProductRepository>,
        category_repository: Arc<dyn CategoryRepository>,
        cache: Arc<dyn CacheInterface>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            product_repository,
            category_repository,
            cache,
            policy,
        }
    }

    /// Returns the active cache policy.
    #[must_use]
    pub const fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Looks up a cached product. Any cache fault counts as a miss.
    async fn read_cached(&self, key: &str) -> Option<ProductDto> {
        if !self.cache.is_enabled() {
            return None;
        }

        match self.cache.get_raw(key).await {
            Ok(Some(payload)) => match decode_product(&payload) {
                Ok(product) => {
                    debug!("Cache hit for product: {}", key);
                    Some(product)
                }
                Err(e) => {
                    warn!(key, error = %e, "Ignoring unreadable cached product");
                    None
                }
            },
            Ok(None) => {
                debug!("Cache miss for product: {}", key);
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, falling back to store");
                None
            }
        }
    }

    /// Writes a product to the cache. Failures are logged and swallowed.
    async fn write_cached(&self, key: &str, product: &ProductDto) {
        let payload = match encode_product(product) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key, error = %e, "Failed to encode product for cache");
                return;
            }
        };

        if let Err(e) = self.cache.set_raw(key, &payload, self.policy.ttl).await {
            warn!(key, error = %e, "Failed to cache product");
        }
    }

    /// Removes a cached product if the policy asks for it.
    async fn invalidate(&self, key: &str) {
        if !self.policy.invalidate_on_write {
            return;
        }

        match self.cache.delete(key).await {
            Ok(removed) => debug!("Invalidated cached product {}: {}", key, removed),
            Err(e) => warn!(key, error = %e, "Failed to invalidate cached product"),
        }
    }

    /// Loads the categories named by `ids`. Every id must exist.
    async fn resolve_categories(&self, ids: &[CategoryId]) -> CatalogResult<Vec<Category>> {
        let mut wanted = ids.to_vec();
        wanted.sort_unstable();
        wanted.dedup();

        let found = self.category_repository.find_by_ids(&wanted).await?;
        if let Some(missing) = wanted
            .iter()
            .find(|id| !found.iter().any(|category| category.id == **id))
        {
            return Err(CatalogError::not_found("Category", missing));
        }
        Ok(found)
    }
}

#[async_trait]
impl ProductService for ProductServiceComponent {
    async fn find_all_paged(&self, page: PageRequest) -> CatalogResult<Page<ProductDto>> {
        debug!("Listing products, page: {}, size: {}", page.page, page.size);

        let products = self.product_repository.find_all(page).await?;
        Ok(mappers::product_page(products))
    }

    async fn find_by_id(&self, id: ProductId) -> CatalogResult<ProductDto> {
        debug!("Getting product: {}", id);

        let cache_key = cache_keys::product_by_id(id);
        if let Some(cached) = self.read_cached(&cache_key).await {
            return Ok(cached);
        }

        let product = self
            .product_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Product", id))?;

        let response = ProductDto::from(product);
        if self.policy.populate_on_read {
            self.write_cached(&cache_key, &response).await;
        }

        Ok(response)
    }

    async fn insert(&self, request: ProductRequest) -> CatalogResult<ProductDto> {
        debug!("Creating product: {}", request.name);

        request.validate_request()?;

        let categories = self.resolve_categories(&request.category_ids).await?;
        let new_product = mappers::new_product(request, categories);
        let saved = self.product_repository.save(&new_product).await?;

        let response = ProductDto::from(saved);
        self.write_cached(&cache_keys::product_by_id(response.id), &response)
            .await;

        info!("Product created: {}", response.id);
        Ok(response)
    }

    async fn update(&self, id: ProductId, request: ProductRequest) -> CatalogResult<ProductDto> {
        debug!("Updating product: {}", id);

        request.validate_request()?;

        let mut product = self
            .product_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Product", id))?;

        let categories = self.resolve_categories(&request.category_ids).await?;
        product.apply(mappers::new_product(request, categories));

        let updated = self.product_repository.update(&product).await?;
        self.invalidate(&cache_keys::product_by_id(id)).await;

        info!("Product updated: {}", id);
        Ok(ProductDto::from(updated))
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<()> {
        debug!("Deleting product: {}", id);

        let deleted = self.product_repository.delete(id).await?;
        if !deleted {
            return Err(CatalogError::not_found("Product", id));
        }

        self.invalidate(&cache_keys::product_by_id(id)).await;

        info!("Product deleted: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for ProductServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductServiceComponent")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        computers, electronics, product_request, stored_product, InMemoryCache,
        InMemoryCategoryRepository, InMemoryProductRepository,
    };
    use catalog_core::{NewProduct, Product};
    use mockall::mock;
    use std::time::Duration;

    mock! {
        pub ProductRepo {}

        #[async_trait]
        impl ProductRepository for ProductRepo {
            async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>>;
            async fn find_all(&self, page: PageRequest) -> CatalogResult<Page<Product>>;
            async fn save(&self, product: &NewProduct) -> CatalogResult<Product>;
            async fn update(&self, product: &Product) -> CatalogResult<Product>;
            async fn delete(&self, id: ProductId) -> CatalogResult<bool>;
            async fn exists(&self, id: ProductId) -> CatalogResult<bool>;
            async fn count(&self) -> CatalogResult<u64>;
        }
    }

    struct Fixture {
        products: Arc<InMemoryProductRepository>,
        cache: Arc<InMemoryCache>,
        service: ProductServiceComponent,
    }

    fn fixture(policy: CachePolicy) -> Fixture {
        let products = Arc::new(InMemoryProductRepository::with_products(vec![
            stored_product(1, "The Lord of the Rings"),
            stored_product(2, "Smart TV"),
        ]));
        let categories = Arc::new(InMemoryCategoryRepository::with_categories(vec![
            electronics(),
            computers(),
        ]));
        let cache = Arc::new(InMemoryCache::new());
        let service = ProductServiceComponent::new(
            Arc::clone(&products) as Arc<dyn ProductRepository>,
            categories,
            Arc::clone(&cache) as Arc<dyn CacheInterface>,
            policy,
        );
        Fixture {
            products,
            cache,
            service,
        }
    }

    fn invalidating() -> CachePolicy {
        CachePolicy {
            invalidate_on_write: true,
            ..CachePolicy::default()
        }
    }

    // =========================================================================
    // find_by_id
    // =========================================================================

    #[tokio::test]
    async fn test_find_by_id_store_only_leaves_cache_untouched() {
        let f = fixture(CachePolicy::default());

        let product = f.service.find_by_id(ProductId::new(1)).await.unwrap();

        assert_eq!(product, ProductDto::from(stored_product(1, "The Lord of the Rings")));
        assert_eq!(f.products.find_by_id_calls(), 1);
        assert_eq!(f.cache.set_calls(), 0);
        assert_eq!(f.cache.value("1"), None);
    }

    #[tokio::test]
    async fn test_find_by_id_cached_never_touches_store() {
        let mut repo = MockProductRepo::new();
        repo.expect_find_by_id().never();

        let cached = ProductDto::from(stored_product(7, "Cached Notebook"));
        let cache = Arc::new(InMemoryCache::new());
        cache.put("7", &encode_product(&cached).unwrap());

        let service = ProductServiceComponent::new(
            Arc::new(repo),
            Arc::new(InMemoryCategoryRepository::new()),
            Arc::clone(&cache) as Arc<dyn CacheInterface>,
            CachePolicy::default(),
        );

        let product = service.find_by_id(ProductId::new(7)).await.unwrap();
        assert_eq!(product, cached);
        assert_eq!(cache.get_calls(), 1);
    }

    #[tokio::test]
    async fn test_find_by_id_missing_is_not_found() {
        let f = fixture(CachePolicy::default());

        let err = f.service.find_by_id(ProductId::new(1000)).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NotFound { resource_type: "Product", ref id } if id == "1000"
        ));
    }

    #[tokio::test]
    async fn test_corrupt_payload_falls_back_to_store() {
        let f = fixture(CachePolicy::default());
        f.cache.put("1", "{\"id\": 1, \"name\": ");

        let product = f.service.find_by_id(ProductId::new(1)).await.unwrap();

        assert_eq!(product.name, "The Lord of the Rings");
        assert_eq!(f.products.find_by_id_calls(), 1);
        assert_eq!(f.cache.value("1").as_deref(), Some("{\"id\": 1, \"name\": "));
    }

    #[tokio::test]
    async fn test_cache_outage_falls_back_to_store() {
        let f = fixture(CachePolicy::default());
        f.cache.fail_all();

        let product = f.service.find_by_id(ProductId::new(2)).await.unwrap();

        assert_eq!(product.name, "Smart TV");
        assert_eq!(f.products.find_by_id_calls(), 1);
    }

    #[tokio::test]
    async fn test_populate_on_read_writes_miss_back() {
        let f = fixture(CachePolicy {
            populate_on_read: true,
            ttl: Some(Duration::from_secs(60)),
            ..CachePolicy::default()
        });

        let first = f.service.find_by_id(ProductId::new(1)).await.unwrap();
        let second = f.service.find_by_id(ProductId::new(1)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(f.products.find_by_id_calls(), 1);
        assert_eq!(f.cache.ttl("1"), Some(Duration::from_secs(60)));
    }

    // =========================================================================
    // insert
    // =========================================================================

    #[tokio::test]
    async fn test_insert_writes_serialized_product_to_cache() {
        let f = fixture(CachePolicy::default());

        let created = f
            .service
            .insert(product_request("Gaming Chair", vec![computers().id]))
            .await
            .unwrap();

        assert_eq!(created.id, ProductId::new(3));
        let key = cache_keys::product_by_id(created.id);
        assert_eq!(f.cache.value(&key), Some(encode_product(&created).unwrap()));
        assert_eq!(f.cache.ttl(&key), None);
    }

    #[tokio::test]
    async fn test_find_after_insert_is_served_from_cache() {
        let f = fixture(CachePolicy::default());

        let created = f
            .service
            .insert(product_request("Gaming Chair", vec![computers().id, electronics().id]))
            .await
            .unwrap();
        let found = f.service.find_by_id(created.id).await.unwrap();

        assert_eq!(found, created);
        assert_eq!(found.categories.len(), 2);
        assert_eq!(f.products.find_by_id_calls(), 0);
    }

    #[tokio::test]
    async fn test_insert_overwrites_existing_entry() {
        let f = fixture(CachePolicy::default());
        f.cache.put("3", "stale");

        let created = f
            .service
            .insert(product_request("Gaming Chair", vec![]))
            .await
            .unwrap();

        assert_eq!(f.cache.value("3"), Some(encode_product(&created).unwrap()));
    }

    #[tokio::test]
    async fn test_insert_succeeds_when_cache_is_down() {
        let f = fixture(CachePolicy::default());
        f.cache.fail_all();

        let created = f
            .service
            .insert(product_request("Gaming Chair", vec![]))
            .await
            .unwrap();

        assert!(f.products.stored(created.id).is_some());
        assert_eq!(f.cache.set_calls(), 1);
    }

    #[tokio::test]
    async fn test_insert_applies_policy_ttl() {
        let f = fixture(CachePolicy {
            ttl: Some(Duration::from_secs(300)),
            ..CachePolicy::default()
        });

        let created = f
            .service
            .insert(product_request("Gaming Chair", vec![]))
            .await
            .unwrap();

        assert_eq!(
            f.cache.ttl(&cache_keys::product_by_id(created.id)),
            Some(Duration::from_secs(300))
        );
    }

    #[tokio::test]
    async fn test_insert_caches_date_at_store_precision() {
        use chrono::Timelike;

        let f = fixture(invalidating());
        let mut request = product_request("Gaming Chair", vec![]);
        request.date = request.date + chrono::Duration::nanoseconds(123_456_789);

        let created = f.service.insert(request).await.unwrap();

        let stored = f.products.stored(created.id).unwrap();
        let cached =
            decode_product(&f.cache.value(&cache_keys::product_by_id(created.id)).unwrap())
                .unwrap();
        assert_eq!(stored.date.nanosecond(), 123_456_000);
        assert_eq!(cached.date, stored.date);
        assert_eq!(created.date, stored.date);

        // A store read after eviction yields the same representation as the hit.
        f.cache.delete(&cache_keys::product_by_id(created.id)).await.unwrap();
        assert_eq!(f.service.find_by_id(created.id).await.unwrap(), cached);
    }

    #[tokio::test]
    async fn test_insert_with_unknown_category_is_not_found() {
        let f = fixture(CachePolicy::default());

        let err = f
            .service
            .insert(product_request("Gaming Chair", vec![CategoryId::new(99)]))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::NotFound { resource_type: "Category", .. }));
        assert_eq!(f.cache.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_request() {
        let f = fixture(CachePolicy::default());
        let mut request = product_request("Gaming Chair", vec![]);
        request.price = -5.0;

        let err = f.service.insert(request).await.unwrap_err();

        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(f.products.count().await.unwrap(), 2);
    }

    // =========================================================================
    // update
    // =========================================================================

    #[tokio::test]
    async fn test_update_leaves_stale_entry_by_default() {
        let f = fixture(CachePolicy::default());
        let created = f
            .service
            .insert(product_request("Gaming Chair", vec![]))
            .await
            .unwrap();

        let updated = f
            .service
            .update(created.id, product_request("Office Chair", vec![computers().id]))
            .await
            .unwrap();
        assert_eq!(updated.name, "Office Chair");

        // The cache still holds the pre-update representation.
        let found = f.service.find_by_id(created.id).await.unwrap();
        assert_eq!(found.name, "Gaming Chair");
        assert_eq!(found, created);
        assert_eq!(f.products.stored(created.id).unwrap().name, "Office Chair");
        assert_eq!(f.cache.delete_calls(), 0);
    }

    #[tokio::test]
    async fn test_update_invalidates_when_enabled() {
        let f = fixture(invalidating());
        let created = f
            .service
            .insert(product_request("Gaming Chair", vec![]))
            .await
            .unwrap();

        f.service
            .update(created.id, product_request("Office Chair", vec![]))
            .await
            .unwrap();

        let key = cache_keys::product_by_id(created.id);
        assert_eq!(f.cache.value(&key), None);
        let found = f.service.find_by_id(created.id).await.unwrap();
        assert_eq!(found.name, "Office Chair");
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_categories() {
        let f = fixture(CachePolicy::default());

        let updated = f
            .service
            .update(ProductId::new(1), product_request("Collector Edition", vec![computers().id]))
            .await
            .unwrap();

        assert_eq!(updated.id, ProductId::new(1));
        assert!((updated.price - 1250.5).abs() < f64::EPSILON);
        let stored = f.products.stored(ProductId::new(1)).unwrap();
        assert_eq!(stored.categories, vec![computers()]);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let f = fixture(CachePolicy::default());

        let err = f
            .service
            .update(ProductId::new(1000), product_request("Office Chair", vec![]))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_with_unknown_category_keeps_store_unchanged() {
        let f = fixture(CachePolicy::default());

        let err = f
            .service
            .update(ProductId::new(2), product_request("Office Chair", vec![CategoryId::new(42)]))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::NotFound { resource_type: "Category", .. }));
        assert_eq!(f.products.stored(ProductId::new(2)).unwrap().name, "Smart TV");
    }

    // =========================================================================
    // delete
    // =========================================================================

    #[tokio::test]
    async fn test_delete_existing() {
        let f = fixture(CachePolicy::default());

        f.service.delete(ProductId::new(1)).await.unwrap();
        assert!(f.products.stored(ProductId::new(1)).is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let f = fixture(CachePolicy::default());

        let err = f.service.delete(ProductId::new(1000)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_with_dependents_is_integrity_violation() {
        let f = fixture(CachePolicy::default());
        f.products.block_delete(ProductId::new(2));

        let err = f.service.delete(ProductId::new(2)).await.unwrap_err();

        assert!(matches!(err, CatalogError::IntegrityViolation(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_delete_calls_store_exactly_once() {
        let mut repo = MockProductRepo::new();
        repo.expect_delete()
            .withf(|id| *id == ProductId::new(1))
            .times(1)
            .returning(|_| Ok(true));

        let cache = Arc::new(InMemoryCache::new());
        let service = ProductServiceComponent::new(
            Arc::new(repo),
            Arc::new(InMemoryCategoryRepository::new()),
            Arc::clone(&cache) as Arc<dyn CacheInterface>,
            CachePolicy::default(),
        );

        service.delete(ProductId::new(1)).await.unwrap();
        assert_eq!(cache.delete_calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_keeps_cached_entry_by_default() {
        let f = fixture(CachePolicy::default());
        let created = f
            .service
            .insert(product_request("Gaming Chair", vec![]))
            .await
            .unwrap();

        f.service.delete(created.id).await.unwrap();

        // Stale entry: the cached copy outlives the stored row.
        assert_eq!(f.service.find_by_id(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_delete_invalidates_when_enabled() {
        let f = fixture(invalidating());
        let created = f
            .service
            .insert(product_request("Gaming Chair", vec![]))
            .await
            .unwrap();

        f.service.delete(created.id).await.unwrap();

        assert_eq!(f.cache.value(&cache_keys::product_by_id(created.id)), None);
        assert!(f.service.find_by_id(created.id).await.unwrap_err().is_not_found());
    }

    // =========================================================================
    // find_all_paged
    // =========================================================================

    #[tokio::test]
    async fn test_find_all_paged_bypasses_cache() {
        let f = fixture(CachePolicy::default());

        let page = f.service.find_all_paged(PageRequest::new(0, 1)).await.unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page.total_elements(), 2);
        assert!(page.has_next());
        assert_eq!(f.cache.get_calls(), 0);
        assert_eq!(f.cache.set_calls(), 0);
    }
}
