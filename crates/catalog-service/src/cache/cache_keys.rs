//! Cache key generators.
//!
//! Product entries are keyed by the bare decimal id, with no namespace
//! prefix, so existing entries written by other clients stay readable.

use catalog_core::ProductId;

/// Cache key for a product.
#[must_use]
pub fn product_by_id(id: ProductId) -> String {
    id.to_string()
}
