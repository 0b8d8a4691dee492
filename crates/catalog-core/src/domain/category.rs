//! Category entity.

use crate::{CategoryId, Entity};
use serde::{Deserialize, Serialize};

/// A product category. Associated with zero or more products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// Store-assigned identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
}

impl Category {
    /// Creates a category from a persisted id and name.
    #[must_use]
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Renames the category.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

impl Entity<CategoryId> for Category {
    fn id(&self) -> CategoryId {
        self.id
    }
}

/// A category that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// Display name.
    pub name: String,
}

impl NewCategory {
    /// Creates a new unsaved category.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Attaches the store-assigned id.
    #[must_use]
    pub fn into_category(self, id: CategoryId) -> Category {
        Category { id, name: self.name }
    }
}
