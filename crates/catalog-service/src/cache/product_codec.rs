//! JSON codec for cached products.

use crate::dto::ProductDto;
use catalog_core::CatalogResult;
use thiserror::Error;

/// A cached payload that could not be turned back into a product.
///
/// Never surfaced to callers: the read path logs it and falls back to the
/// store.
#[derive(Debug, Error)]
#[error("Failed to deserialize cached product: {0}")]
pub struct DeserializationError(#[from] serde_json::Error);

/// Serializes a product into its cached form.
///
/// # Errors
///
/// Returns `CatalogError::Serialization` if the product cannot be encoded.
pub fn encode_product(product: &ProductDto) -> CatalogResult<String> {
    Ok(serde_json::to_string(product)?)
}

/// Deserializes a cached payload.
///
/// # Errors
///
/// Returns [`DeserializationError`] for malformed or incompatible payloads.
pub fn decode_product(payload: &str) -> Result<ProductDto, DeserializationError> {
    Ok(serde_json::from_str(payload)?)
}
