//! Product service trait definition.

use crate::dto::{ProductDto, ProductRequest};
use catalog_core::{CatalogResult, Interface, Page, PageRequest, ProductId};
use async_trait::async_trait;

/// Product service trait.
#[async_trait]
pub trait ProductService: Interface + Send + Sync {
    /// Lists products with pagination. Never cached.
    async fn find_all_paged(&self, page: PageRequest) -> CatalogResult<Page<ProductDto>>;

    /// Gets a product, trying the cache before the store.
    async fn find_by_id(&self, id: ProductId) -> CatalogResult<ProductDto>;

    /// Creates a product and writes it to the cache.
    async fn insert(&self, request: ProductRequest) -> CatalogResult<ProductDto>;

    /// Replaces every field of a product.
    async fn update(&self, id: ProductId, request: ProductRequest) -> CatalogResult<ProductDto>;

    /// Deletes a product.
    async fn delete(&self, id: ProductId) -> CatalogResult<()>;
}
