//! # Catalog Server Library
//!
//! Dependency injection wiring and startup helpers for the catalog process.

pub mod di;
pub mod health;
pub mod startup;
