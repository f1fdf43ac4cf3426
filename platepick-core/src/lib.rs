//! Platepick Core - Dish model and data boundary
//!
//! This crate provides the shared vocabulary for the narrowing engine:
//! - Dish records with optional AI metadata
//! - Attribute kinds (question axes) with priorities and membership tests
//! - Sanitize-and-default for raw enrichment output
//! - Dish sources (JSON catalog, in-memory)

pub mod attribute;
pub mod dish;
pub mod sanitize;
pub mod source;

// Re-exports for convenient access
pub use attribute::{normalize_token, AttributeKind, MILD, SPICY};
pub use dish::{ComfortVsLight, Dish, DishAiMeta, ProteinType, ServingTemperature};
pub use sanitize::{sanitize_ai_meta, to_snake_case};
pub use source::{CatalogError, CatalogSource, DishSource, InMemorySource};
