//! # Catalog Service
//!
//! Product and category services. Product lookups go through a Redis
//! cache-aside path: reads try the cache first, inserts warm it, and the
//! [`CachePolicy`] decides whether misses populate it and whether writes
//! invalidate it.

pub mod cache;
pub mod category_service;
pub mod dto;
pub mod r#impl;
pub mod mappers;
pub mod product_service;

#[cfg(test)]
mod testing;

pub use cache::*;
pub use category_service::*;
pub use dto::*;
pub use product_service::*;
pub use r#impl::{CategoryServiceComponent, ProductServiceComponent, ProductServiceComponentParameters};
