//! Product DTOs.

use super::CategoryDto;
use catalog_core::validation::rules;
use catalog_core::{CategoryId, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create or replace a product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductRequest {
    #[validate(length(min = 5, max = 60, message = "Name must be 5-60 characters"))]
    pub name: String,

    #[validate(custom(function = "rules::not_blank", message = "Description is required"))]
    pub description: String,

    #[validate(custom(function = "rules::positive_price", message = "Price must be positive"))]
    pub price: f64,

    #[validate(url(message = "Invalid image URL"))]
    pub img_url: String,

    pub date: DateTime<Utc>,

    /// Categories to associate. Every id must exist.
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
}

/// Product response DTO.
///
/// This is also the cached representation: its JSON form is what the cache
/// stores under the product id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDto {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub img_url: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub categories: Vec<CategoryDto>,
}
