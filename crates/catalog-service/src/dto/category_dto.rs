//! Category DTOs.

use catalog_core::validation::rules;
use catalog_core::CategoryId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create or rename a category.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(
        length(max = 255, message = "Name cannot exceed 255 characters"),
        custom(function = "rules::not_blank", message = "Name is required")
    )]
    pub name: String,
}

impl CategoryRequest {
    /// Creates a request with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Category response DTO.
///
/// Also embedded in [`ProductDto`](super::ProductDto), so it is part of the
/// cached product payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDto {
    pub id: CategoryId,
    pub name: String,
}
