//! marks core library
//!
//! This crate provides the storage and query layer for marks, a personal
//! bookmark catalog: the `Bookmark` entity, a single-file SQLite catalog
//! with URL uniqueness and substring search, and JSON import/export.
//!
//! # Quick Start
//!
//! ```text
//! let mut catalog = Catalog::open(config.db_path())?;
//!
//! // Add a bookmark
//! let mut bookmark = Bookmark::new("https://example.com");
//! bookmark.title = "Example".to_string();
//! let id = catalog.add(&bookmark)?;
//!
//! // Query
//! let found = catalog.search("example", SearchField::All)?;
//! ```
//!
//! # Modules
//!
//! - `models`: the `Bookmark` entity, tag normalization, patches, search scopes
//! - `storage`: SQLite catalog, schema, typed errors, JSON interchange
//! - `config`: application configuration

pub mod config;
pub mod models;
pub mod storage;

pub use config::Config;
pub use models::{Bookmark, BookmarkPatch, SearchField};
pub use storage::{
    export_bookmarks, import_bookmarks, Catalog, CatalogStats, StorageError, StorageResult,
};
