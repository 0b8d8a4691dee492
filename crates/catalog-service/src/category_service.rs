//! Category service trait definition.

use crate::dto::{CategoryDto, CategoryRequest};
use catalog_core::{CatalogResult, CategoryId, Interface, Page, PageRequest};
use async_trait::async_trait;

/// Category service trait.
#[async_trait]
pub trait CategoryService: Interface + Send + Sync {
    /// Lists every category ordered by name.
    async fn find_all(&self) -> CatalogResult<Vec<CategoryDto>>;

    /// Lists categories with pagination.
    async fn find_all_paged(&self, page: PageRequest) -> CatalogResult<Page<CategoryDto>>;

    /// Gets a category by ID.
    async fn find_by_id(&self, id: CategoryId) -> CatalogResult<CategoryDto>;

    /// Creates a category.
    async fn insert(&self, request: CategoryRequest) -> CatalogResult<CategoryDto>;

    /// Renames a category.
    async fn update(&self, id: CategoryId, request: CategoryRequest) -> CatalogResult<CategoryDto>;

    /// Deletes a category that no product references.
    async fn delete(&self, id: CategoryId) -> CatalogResult<()>;
}
