//! Type catalog and lazy resolver.
//!
//! The catalog is a closed table of type names built once; each entry
//! starts unresolved and is resolved at most once, the first time a
//! caller asks for it, by loading the entry's defining module.

pub mod catalog;
pub mod resolver;

pub use catalog::{CatalogEntry, CatalogStats, ModelCatalog, ModelLocator, ModuleLoader};
pub use resolver::{Constructor, ModelClass, ModelModule};
