//! Template data the game is built from.

pub mod catalog;

pub use catalog::{CatalogError, TemplateCatalog};
