//! # Catalog Core
//!
//! Core types, domain entities, traits, and error definitions shared by every
//! layer of the catalog backend.

pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod telemetry;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use traits::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::{module, HasComponent, Interface};
