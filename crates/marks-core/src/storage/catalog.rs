//! Bookmark catalog backed by a single SQLite file
//!
//! The `Catalog` owns the database connection. Write operations take
//! `&mut self`, so concurrent in-process writers are serialized by the
//! borrow checker; reads take `&self`.
//!
//! URL syntax is never validated here, only uniqueness. Absence is always
//! reported as a value (`None` / `false`), never as an error.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use tracing::debug;

use crate::models::{split_tags, Bookmark, BookmarkPatch, SearchField};
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::schema::{init_schema, needs_init};

const BOOKMARK_COLUMNS: &str =
    "id, title, url, description, tags, created_at, updated_at, visit_count";

/// Aggregate catalog statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CatalogStats {
    /// Total number of stored bookmarks
    pub total: i64,
    /// Number of bookmarks visited at least once
    pub visited: i64,
    /// Highest visit count across all bookmarks (0 when empty)
    pub max_visits: i64,
}

/// Persistent bookmark storage with uniqueness, search, and aggregates
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open or create the catalog database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let conn = Connection::open(path)?;

        if needs_init(&conn) {
            init_schema(&conn)?;
        }

        debug!(path = %path.display(), "opened catalog");
        Ok(Self { conn })
    }

    /// Open an in-memory catalog (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Add a bookmark, returning the assigned id
    ///
    /// Sets both timestamps to now. The bookmark's `visit_count` and
    /// normalized tags are stored as given. Fails with
    /// [`StorageError::UrlConflict`] when the URL is already stored.
    pub fn add(&mut self, bookmark: &Bookmark) -> StorageResult<i64> {
        let tx = self.conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM bookmarks WHERE url = ?1",
                params![bookmark.url],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(StorageError::UrlConflict {
                url: bookmark.url.clone(),
            });
        }

        let now = Utc::now().to_rfc3339();
        tx.execute(
            r#"
            INSERT INTO bookmarks (title, url, description, tags, created_at, updated_at, visit_count)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                bookmark.title,
                bookmark.url,
                bookmark.description,
                bookmark.tags,
                now,
                now,
                bookmark.visit_count,
            ],
        )?;

        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!(id, url = %bookmark.url, "added bookmark");
        Ok(id)
    }

    /// Get a bookmark by id, `None` if absent
    pub fn get_by_id(&self, id: i64) -> StorageResult<Option<Bookmark>> {
        let bookmark = self
            .conn
            .query_row(
                &format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE id = ?1"),
                params![id],
                bookmark_from_row,
            )
            .optional()?;
        Ok(bookmark)
    }

    /// Get a bookmark by exact URL match, `None` if absent
    pub fn get_by_url(&self, url: &str) -> StorageResult<Option<Bookmark>> {
        let bookmark = self
            .conn
            .query_row(
                &format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE url = ?1"),
                params![url],
                bookmark_from_row,
            )
            .optional()?;
        Ok(bookmark)
    }

    /// Get all bookmarks in insertion (id) order
    pub fn get_all(&self) -> StorageResult<Vec<Bookmark>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks ORDER BY id"))?;

        let bookmarks = stmt
            .query_map([], bookmark_from_row)?
            .collect::<Result<Vec<Bookmark>, _>>()?;
        Ok(bookmarks)
    }

    /// Apply a partial update, refreshing `updated_at`
    ///
    /// Returns `Ok(false)` when the id is absent or the patch is empty;
    /// absence is checked before anything else, so a missing id never
    /// surfaces as a conflict. Fails with [`StorageError::UrlConflict`]
    /// when the patch's URL is already used by a different bookmark.
    pub fn update(&mut self, id: i64, patch: &BookmarkPatch) -> StorageResult<bool> {
        if patch.is_empty() {
            return Ok(false);
        }

        let tx = self.conn.transaction()?;

        let exists: Option<i64> = tx
            .query_row(
                "SELECT id FROM bookmarks WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Ok(false);
        }

        if let Some(url) = &patch.url {
            let taken: Option<i64> = tx
                .query_row(
                    "SELECT id FROM bookmarks WHERE url = ?1",
                    params![url],
                    |row| row.get(0),
                )
                .optional()?;
            if let Some(other) = taken {
                if other != id {
                    return Err(StorageError::UrlConflict { url: url.clone() });
                }
            }
        }

        let now = Utc::now().to_rfc3339();
        let tags = patch
            .tags
            .as_ref()
            .map(|tokens| crate::models::join_tags(tokens));

        let mut assignments: Vec<String> = Vec::new();
        let mut values: Vec<&dyn ToSql> = Vec::new();

        if let Some(title) = &patch.title {
            values.push(title);
            assignments.push(format!("title = ?{}", values.len()));
        }
        if let Some(url) = &patch.url {
            values.push(url);
            assignments.push(format!("url = ?{}", values.len()));
        }
        if let Some(description) = &patch.description {
            values.push(description);
            assignments.push(format!("description = ?{}", values.len()));
        }
        if let Some(tags) = &tags {
            values.push(tags);
            assignments.push(format!("tags = ?{}", values.len()));
        }
        values.push(&now);
        assignments.push(format!("updated_at = ?{}", values.len()));

        values.push(&id);
        let sql = format!(
            "UPDATE bookmarks SET {} WHERE id = ?{}",
            assignments.join(", "),
            values.len()
        );

        let changed = tx.execute(&sql, &values[..])?;
        tx.commit()?;

        debug!(id, changed, "updated bookmark");
        Ok(changed > 0)
    }

    /// Hard-delete a bookmark, `Ok(false)` if the id is absent
    pub fn delete(&mut self, id: i64) -> StorageResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?1", params![id])?;
        debug!(id, deleted = changed > 0, "deleted bookmark");
        Ok(changed > 0)
    }

    /// Increment the visit count and refresh `updated_at`
    ///
    /// No-op returning `Ok(false)` when the id is absent.
    pub fn record_visit(&mut self, id: i64) -> StorageResult<bool> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE bookmarks SET visit_count = visit_count + 1, updated_at = ?1 WHERE id = ?2",
            params![now, id],
        )?;
        Ok(changed > 0)
    }

    /// Case-insensitive substring search over the given field scope
    ///
    /// An empty query matches every record. Results come back in the same
    /// id order as [`get_all`](Self::get_all).
    pub fn search(&self, query: &str, field: SearchField) -> StorageResult<Vec<Bookmark>> {
        let pattern = format!("%{}%", escape_like(query));

        let clause = match field {
            SearchField::Title => "title LIKE ?1 ESCAPE '\\'",
            SearchField::Url => "url LIKE ?1 ESCAPE '\\'",
            SearchField::Tags => "COALESCE(tags, '') LIKE ?1 ESCAPE '\\'",
            SearchField::Description => "description LIKE ?1 ESCAPE '\\'",
            SearchField::All => {
                "(title LIKE ?1 ESCAPE '\\' OR url LIKE ?1 ESCAPE '\\' \
                 OR COALESCE(tags, '') LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\')"
            }
        };

        let sql =
            format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE {clause} ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;

        let bookmarks = stmt
            .query_map(params![pattern], bookmark_from_row)?
            .collect::<Result<Vec<Bookmark>, _>>()?;
        Ok(bookmarks)
    }

    /// Aggregate statistics over the whole catalog
    pub fn stats(&self) -> StorageResult<CatalogStats> {
        let stats = self.conn.query_row(
            r#"
            SELECT COUNT(*),
                   COUNT(CASE WHEN visit_count > 0 THEN 1 END),
                   COALESCE(MAX(visit_count), 0)
            FROM bookmarks
            "#,
            [],
            |row| {
                Ok(CatalogStats {
                    total: row.get(0)?,
                    visited: row.get(1)?,
                    max_visits: row.get(2)?,
                })
            },
        )?;
        Ok(stats)
    }

    /// Get all distinct tag tokens, sorted ascending, case preserved
    pub fn all_tags(&self) -> StorageResult<Vec<String>> {
        let counts = self.tag_counts()?;
        Ok(counts.into_keys().collect())
    }

    /// Get tags with usage counts, ordered by count descending then name
    pub fn tags_with_counts(&self) -> StorageResult<Vec<(String, i64)>> {
        let counts = self.tag_counts()?;
        let mut tags: Vec<(String, i64)> = counts.into_iter().collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(tags)
    }

    /// Get the number of stored bookmarks
    pub fn count(&self) -> StorageResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM bookmarks", [], |row| row.get(0))?;
        Ok(count)
    }

    fn tag_counts(&self) -> StorageResult<BTreeMap<String, i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tags FROM bookmarks WHERE tags IS NOT NULL")?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, _>>()?;

        let mut counts = BTreeMap::new();
        for tags in rows {
            for token in split_tags(&tags) {
                *counts.entry(token).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

/// Map a result row onto a `Bookmark`
fn bookmark_from_row(row: &Row) -> rusqlite::Result<Bookmark> {
    Ok(Bookmark {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        url: row.get(2)?,
        description: row.get(3)?,
        tags: row.get(4)?,
        created_at: parse_timestamp(5, row.get(5)?)?,
        updated_at: parse_timestamp(6, row.get(6)?)?,
        visit_count: row.get(7)?,
    })
}

/// Parse a stored RFC 3339 timestamp
///
/// A corrupt timestamp surfaces as a conversion error rather than being
/// silently replaced.
fn parse_timestamp(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Escape LIKE wildcards so queries match them literally
fn escape_like(query: &str) -> String {
    query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
