//! Repository trait definitions.
//!
//! Repositories speak in domain entities and `Option`/`bool` results; turning
//! an absent row into `NotFound` is the service layer's job.

use catalog_core::{
    CatalogResult, Category, CategoryId, Interface, NewCategory, NewProduct, Page, PageRequest,
    Product, ProductId,
};
use async_trait::async_trait;

/// Product repository trait.
#[async_trait]
pub trait ProductRepository: Interface + Send + Sync {
    /// Finds a product by ID, with its categories.
    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>>;

    /// Finds all products with pagination.
    async fn find_all(&self, page: PageRequest) -> CatalogResult<Page<Product>>;

    /// Saves a new product and its category links. The store assigns the id.
    async fn save(&self, product: &NewProduct) -> CatalogResult<Product>;

    /// Replaces the stored fields and category links of an existing product.
    async fn update(&self, product: &Product) -> CatalogResult<Product>;

    /// Deletes a product by ID. Returns false if nothing was deleted.
    async fn delete(&self, id: ProductId) -> CatalogResult<bool>;

    /// Checks whether a product exists.
    async fn exists(&self, id: ProductId) -> CatalogResult<bool>;

    /// Counts all products.
    async fn count(&self) -> CatalogResult<u64>;
}

/// Category repository trait.
#[async_trait]
pub trait CategoryRepository: Interface + Send + Sync {
    /// Finds a category by ID.
    async fn find_by_id(&self, id: CategoryId) -> CatalogResult<Option<Category>>;

    /// Finds every category whose id is in `ids`. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[CategoryId]) -> CatalogResult<Vec<Category>>;

    /// Returns every category ordered by name.
    async fn find_all_ordered(&self) -> CatalogResult<Vec<Category>>;

    /// Finds all categories with pagination.
    async fn find_all(&self, page: PageRequest) -> CatalogResult<Page<Category>>;

    /// Saves a new category. The store assigns the id.
    async fn save(&self, category: &NewCategory) -> CatalogResult<Category>;

    /// Updates an existing category.
    async fn update(&self, category: &Category) -> CatalogResult<Category>;

    /// Deletes a category by ID. Returns false if nothing was deleted.
    ///
    /// Fails with `IntegrityViolation` while products reference it.
    async fn delete(&self, id: CategoryId) -> CatalogResult<bool>;

    /// Checks whether a category exists.
    async fn exists(&self, id: CategoryId) -> CatalogResult<bool>;

    /// Counts all categories.
    async fn count(&self) -> CatalogResult<u64>;
}
