//! JSON import/export for bookmarks
//!
//! Exports write the interchange array atomically (write to temp file,
//! sync, rename) so a reader never observes a partial file. Imports parse
//! the whole array up front; malformed payloads fail without returning
//! partial data.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::models::Bookmark;
use crate::storage::error::{StorageError, StorageResult};

/// Write bookmarks to the given path as a JSON array
pub fn export_bookmarks(bookmarks: &[Bookmark], path: &Path) -> StorageResult<()> {
    let json = serde_json::to_vec_pretty(bookmarks).map_err(|e| StorageError::InvalidFormat {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;

    atomic_write(path, &json)?;
    debug!(count = bookmarks.len(), path = %path.display(), "exported bookmarks");
    Ok(())
}

/// Read a JSON array of bookmark records from the given path
///
/// Tags are re-normalized through the list form on the way in. Malformed
/// JSON or a schema mismatch fails with [`StorageError::InvalidFormat`].
pub fn import_bookmarks(path: &Path) -> StorageResult<Vec<Bookmark>> {
    let content =
        fs::read_to_string(path).map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;

    let bookmarks: Vec<Bookmark> =
        serde_json::from_str(&content).map_err(|e| StorageError::InvalidFormat {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

    debug!(count = bookmarks.len(), path = %path.display(), "imported bookmarks");
    Ok(bookmarks)
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    // Temp file in the same directory (for atomic rename)
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    // Sync to disk before rename
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_bookmarks() -> Vec<Bookmark> {
        let mut first = Bookmark::new("https://first.com");
        first.id = Some(1);
        first.title = "First".to_string();
        first.description = "First bookmark".to_string();
        first.set_tags_from_list(["test"]);

        let mut second = Bookmark::new("https://second.com");
        second.id = Some(2);
        second.title = "Second".to_string();
        second.set_tags_from_list(["demo"]);
        second.visit_count = 4;

        vec![first, second]
    }

    #[test]
    fn test_export_import_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bookmarks.json");

        let bookmarks = sample_bookmarks();
        export_bookmarks(&bookmarks, &path).unwrap();
        assert!(path.exists());

        let imported = import_bookmarks(&path).unwrap();
        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].title, "First");
        assert_eq!(imported[1].title, "Second");
        assert_eq!(imported[0].tags_as_list(), vec!["test"]);
        assert_eq!(imported[1].visit_count, 4);
        assert_eq!(imported, bookmarks);
    }

    #[test]
    fn test_export_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bookmarks.json");

        export_bookmarks(&sample_bookmarks(), &path).unwrap();
        assert!(!temp_dir.path().join("bookmarks.tmp").exists());
    }

    #[test]
    fn test_export_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("bookmarks.json");

        export_bookmarks(&sample_bookmarks(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_import_malformed_json_is_format_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{not valid json").unwrap();

        let err = import_bookmarks(&path).unwrap_err();
        assert!(matches!(err, StorageError::InvalidFormat { .. }));
    }

    #[test]
    fn test_import_schema_mismatch_is_format_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wrong.json");
        // An object, not an array of records
        fs::write(&path, r#"{"url": "https://example.com"}"#).unwrap();

        let err = import_bookmarks(&path).unwrap_err();
        assert!(matches!(err, StorageError::InvalidFormat { .. }));
    }

    #[test]
    fn test_import_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");

        let err = import_bookmarks(&path).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[test]
    fn test_import_empty_array() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.json");
        fs::write(&path, "[]").unwrap();

        assert!(import_bookmarks(&path).unwrap().is_empty());
    }

    #[test]
    fn test_export_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bookmarks.json");

        export_bookmarks(&sample_bookmarks(), &path).unwrap();
        export_bookmarks(&[], &path).unwrap();

        assert!(import_bookmarks(&path).unwrap().is_empty());
    }
}
