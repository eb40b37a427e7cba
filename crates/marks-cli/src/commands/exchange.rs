//! Export and import commands

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use marks_core::{export_bookmarks, import_bookmarks, Catalog, StorageError};

use crate::output::Output;

/// Export all bookmarks to a JSON file
pub fn export(catalog: &Catalog, path: &Path, output: &Output) -> Result<()> {
    let bookmarks = catalog.get_all().context("Failed to read bookmarks")?;
    export_bookmarks(&bookmarks, path)
        .with_context(|| format!("Failed to export to {}", path.display()))?;

    output.success(&format!(
        "Exported {} bookmark(s) to {}",
        bookmarks.len(),
        path.display()
    ));
    Ok(())
}

/// Import bookmarks from a JSON file
///
/// Records whose URL already exists in the catalog are skipped.
pub fn import(catalog: &mut Catalog, path: &Path, output: &Output) -> Result<()> {
    let bookmarks = import_bookmarks(path)
        .with_context(|| format!("Failed to import from {}", path.display()))?;

    let mut added = 0;
    let mut skipped = 0;
    for bookmark in &bookmarks {
        match catalog.add(bookmark) {
            Ok(id) => {
                debug!(id, url = %bookmark.url, "imported bookmark");
                added += 1;
            }
            Err(StorageError::UrlConflict { url }) => {
                output.message(&format!("Skipping duplicate: {}", url));
                skipped += 1;
            }
            Err(e) => return Err(e).context("Failed to store imported bookmark"),
        }
    }

    output.success(&format!(
        "Imported {} bookmark(s) ({} skipped)",
        added, skipped
    ));
    Ok(())
}
