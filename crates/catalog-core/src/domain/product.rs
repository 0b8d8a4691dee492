//! Product entity.

use super::Category;
use crate::{CategoryId, Entity, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog product as persisted by the relational store.
///
/// `categories` behaves as a set: it is kept ordered by category id with no
/// duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier, immutable once set.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Image URL.
    pub img_url: String,
    /// Creation date.
    pub date: DateTime<Utc>,
    /// Associated categories.
    pub categories: Vec<Category>,
}

impl Product {
    /// Copies every mutable field from `changes`, keeping the identifier.
    pub fn apply(&mut self, changes: NewProduct) {
        self.name = changes.name;
        self.description = changes.description;
        self.price = changes.price;
        self.img_url = changes.img_url;
        self.date = changes.date;
        self.categories = normalize(changes.categories);
    }

    /// Returns the ids of the associated categories.
    #[must_use]
    pub fn category_ids(&self) -> Vec<CategoryId> {
        self.categories.iter().map(|c| c.id).collect()
    }
}

impl Entity<ProductId> for Product {
    fn id(&self) -> ProductId {
        self.id
    }
}

/// A product that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub img_url: String,
    pub date: DateTime<Utc>,
    pub categories: Vec<Category>,
}

impl NewProduct {
    /// Attaches the store-assigned id.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            img_url: self.img_url,
            date: self.date,
            categories: normalize(self.categories),
        }
    }

    /// Returns the ids of the referenced categories.
    #[must_use]
    pub fn category_ids(&self) -> Vec<CategoryId> {
        let mut ids: Vec<CategoryId> = self.categories.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

fn normalize(mut categories: Vec<Category>) -> Vec<Category> {
    categories.sort_by_key(|c| c.id);
    categories.dedup_by_key(|c| c.id);
    categories
}
