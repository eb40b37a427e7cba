//! Storage layer
//!
//! A single SQLite file holds the whole catalog. The [`Catalog`] wraps the
//! connection and enforces URL uniqueness; [`exchange`] handles the JSON
//! interchange format for import/export.

pub mod catalog;
pub mod error;
pub mod exchange;
pub mod schema;

pub use catalog::{Catalog, CatalogStats};
pub use error::{StorageError, StorageResult};
pub use exchange::{export_bookmarks, import_bookmarks};
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
