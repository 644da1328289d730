//! Tag catalog for the RFID batch writer.
//!
//! Maps scanned tag identifiers to article names through a fixed table that
//! lives for the whole process. Several tags may name the same article.

pub mod catalog;
pub mod error;

pub use catalog::{TagCatalog, BUILTIN_TAGS};
pub use error::{CatalogError, CatalogResult};
