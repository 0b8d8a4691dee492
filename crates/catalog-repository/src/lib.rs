//! # Catalog Repository
//!
//! Data access for the catalog backend:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn ProductRepository> / Arc<dyn CategoryRepository>
//! MySqlProductRepository / MySqlCategoryRepository
//!   ↓  Arc<dyn DatabasePoolInterface>
//! MySQL (tb_product, tb_category, tb_product_category)
//! ```
//!
//! Driver errors convert into `CatalogError` through `From<sqlx::Error>`, so a
//! blocked foreign key surfaces as `IntegrityViolation`.

pub mod mysql;
pub mod pool;
pub mod traits;

pub use mysql::*;
pub use pool::*;
pub use traits::*;
