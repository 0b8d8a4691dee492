//! Category service implementation.

use crate::category_service::CategoryService;
use crate::dto::{CategoryDto, CategoryRequest};
use crate::mappers;
use catalog_core::{
    CatalogError, CatalogResult, CategoryId, NewCategory, Page, PageRequest, ValidateExt,
};
use catalog_repository::CategoryRepository;
use async_trait::async_trait;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Category service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = CategoryService)]
pub struct CategoryServiceComponent {
    #[shaku(inject)]
    category_repository: Arc<dyn CategoryRepository>,
}

impl CategoryServiceComponent {
    /// Creates a category service without a DI module.
    #[must_use]
    pub fn new(category_repository: Arc<dyn CategoryRepository>) -> Self {
        Self {
            category_repository,
        }
    }
}

#[async_trait]
impl CategoryService for CategoryServiceComponent {
    async fn find_all(&self) -> CatalogResult<Vec<CategoryDto>> {
        debug!("Listing all categories");

        let categories = self.category_repository.find_all_ordered().await?;
        Ok(categories.into_iter().map(CategoryDto::from).collect())
    }

    async fn find_all_paged(&self, page: PageRequest) -> CatalogResult<Page<CategoryDto>> {
        debug!("Listing categories, page: {}, size: {}", page.page, page.size);

        let categories = self.category_repository.find_all(page).await?;
        Ok(mappers::category_page(categories))
    }

    async fn find_by_id(&self, id: CategoryId) -> CatalogResult<CategoryDto> {
        debug!("Getting category: {}", id);

        self.category_repository
            .find_by_id(id)
            .await?
            .map(CategoryDto::from)
            .ok_or_else(|| CatalogError::not_found("Category", id))
    }

    async fn insert(&self, request: CategoryRequest) -> CatalogResult<CategoryDto> {
        request.validate_request()?;

        let saved = self
            .category_repository
            .save(&NewCategory::from(request))
            .await?;

        info!("Category created: {} ({})", saved.name, saved.id);
        Ok(CategoryDto::from(saved))
    }

    async fn update(&self, id: CategoryId, request: CategoryRequest) -> CatalogResult<CategoryDto> {
        request.validate_request()?;

        let mut category = self
            .category_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Category", id))?;

        category.rename(request.name);
        let updated = self.category_repository.update(&category).await?;

        info!("Category updated: {}", id);
        Ok(CategoryDto::from(updated))
    }

    async fn delete(&self, id: CategoryId) -> CatalogResult<()> {
        if !self.category_repository.delete(id).await? {
            return Err(CatalogError::not_found("Category", id));
        }

        info!("Category deleted: {}", id);
        Ok(())
    }
}
