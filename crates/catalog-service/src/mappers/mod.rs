//! Entity-DTO mappers.

use crate::dto::{CategoryDto, CategoryRequest, ProductDto, ProductRequest};
use catalog_core::{Category, NewCategory, NewProduct, Page, Product};
use chrono::SubsecRound;

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            img_url: product.img_url,
            date: product.date,
            categories: product.categories.into_iter().map(CategoryDto::from).collect(),
        }
    }
}

impl From<CategoryRequest> for NewCategory {
    fn from(request: CategoryRequest) -> Self {
        NewCategory::new(request.name)
    }
}

/// Builds an unsaved product from a request and its resolved categories.
///
/// The date is truncated to microseconds, the precision of the `date` column,
/// so the returned product matches what a later store read yields.
#[must_use]
pub fn new_product(request: ProductRequest, categories: Vec<Category>) -> NewProduct {
    NewProduct {
        name: request.name,
        description: request.description,
        price: request.price,
        img_url: request.img_url,
        date: request.date.trunc_subsecs(6),
        categories,
    }
}

/// Converts a page of products to a page of DTOs.
#[must_use]
pub fn product_page(page: Page<Product>) -> Page<ProductDto> {
    page.map(ProductDto::from)
}

/// Converts a page of categories to a page of DTOs.
#[must_use]
pub fn category_page(page: Page<Category>) -> Page<CategoryDto> {
    page.map(CategoryDto::from)
}
