//! Service implementations.
//!
//! Trait definitions live in the parent module (e.g. `product_service.rs`).

pub mod category_service_impl;
pub mod product_service_impl;

pub use category_service_impl::CategoryServiceComponent;
pub use product_service_impl::{ProductServiceComponent, ProductServiceComponentParameters};
