//! Bookmark commands: add, list, show, edit, delete, search, visit

use anyhow::{bail, Context, Result};
use std::str::FromStr;
use tracing::{debug, warn};

use marks_core::{Bookmark, BookmarkPatch, Catalog, SearchField, StorageError};

use crate::metadata;
use crate::output::Output;
use crate::prompt;
use crate::validate::is_valid_bookmark_url;

/// Add a new bookmark
pub async fn add(
    catalog: &mut Catalog,
    url: String,
    title: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
    no_fetch: bool,
    output: &Output,
) -> Result<()> {
    if !is_valid_bookmark_url(&url) {
        bail!("Invalid URL: {} (expected http:// or https://)", url);
    }

    let mut bookmark = Bookmark::new(&url);

    // Fetch the page title when none was given
    let fetched = if title.is_none() && !no_fetch {
        output.message(&format!("Fetching metadata from {}...", url));
        Some(metadata::fetch_metadata(&url).await)
    } else {
        None
    };

    bookmark.title = title
        .or_else(|| fetched.as_ref().and_then(|m| m.title.clone()))
        .unwrap_or_default();
    bookmark.description = description
        .or_else(|| fetched.as_ref().and_then(|m| m.description.clone()))
        .unwrap_or_default();
    bookmark.set_tags_from_list(tags);

    match catalog.add(&bookmark) {
        Ok(id) => {
            debug!(id, url = %bookmark.url, "bookmark added");
            bookmark.id = Some(id);
            if output.is_quiet() {
                println!("{}", id);
            } else {
                output.success(&format!("Added bookmark {} ({})", id, bookmark.url));
            }
            Ok(())
        }
        Err(StorageError::UrlConflict { url }) => {
            bail!("A bookmark for {} already exists", url)
        }
        Err(e) => Err(e).context("Failed to add bookmark"),
    }
}

/// List all bookmarks
pub fn list(catalog: &Catalog, output: &Output) -> Result<()> {
    let bookmarks = catalog.get_all().context("Failed to list bookmarks")?;
    output.print_bookmarks(&bookmarks);
    Ok(())
}

/// Show a single bookmark
pub fn show(catalog: &Catalog, id: i64, output: &Output) -> Result<()> {
    match catalog.get_by_id(id).context("Failed to load bookmark")? {
        Some(bookmark) => {
            output.print_bookmark(&bookmark);
            Ok(())
        }
        None => bail!("Bookmark {} not found", id),
    }
}

/// Edit a bookmark interactively
pub fn edit(catalog: &mut Catalog, id: i64, output: &Output) -> Result<()> {
    let Some(bookmark) = catalog.get_by_id(id).context("Failed to load bookmark")? else {
        bail!("Bookmark {} not found", id);
    };

    if !output.should_prompt() {
        bail!("Edit is interactive; run without --json/--quiet");
    }

    println!("Editing bookmark {} (press Enter to keep current value)", id);

    let title = prompt::prompt_with_default("Title", &bookmark.title)?;
    let url = prompt::prompt_with_default("URL", &bookmark.url)?;
    let description = prompt::prompt_with_default("Description", &bookmark.description)?;
    let current_tags = bookmark.tags_as_list().join(", ");
    let tags = prompt::prompt_with_default("Tags (comma-separated)", &current_tags)?;

    if let Some(ref new_url) = url {
        if !is_valid_bookmark_url(new_url) {
            bail!("Invalid URL: {} (expected http:// or https://)", new_url);
        }
    }

    let patch = BookmarkPatch {
        title,
        url,
        description,
        tags: tags.map(|t| t.split(',').map(|s| s.to_string()).collect()),
    };

    match catalog.update(id, &patch) {
        Ok(true) => {
            output.success(&format!("Updated bookmark {}", id));
            Ok(())
        }
        Ok(false) => {
            output.message("No changes made.");
            Ok(())
        }
        Err(StorageError::UrlConflict { url }) => {
            bail!("A bookmark for {} already exists", url)
        }
        Err(e) => Err(e).context("Failed to update bookmark"),
    }
}

/// Delete a bookmark
pub fn delete(catalog: &mut Catalog, id: i64, output: &Output) -> Result<()> {
    let Some(bookmark) = catalog.get_by_id(id).context("Failed to load bookmark")? else {
        bail!("Bookmark {} not found", id);
    };

    if output.should_prompt() {
        let confirmed = prompt::confirm(&format!("Delete \"{}\" ({})?", bookmark.title, bookmark.url))?;
        if !confirmed {
            output.message("Cancelled.");
            return Ok(());
        }
    }

    if catalog.delete(id).context("Failed to delete bookmark")? {
        output.success(&format!("Deleted bookmark {}", id));
    } else {
        bail!("Bookmark {} not found", id);
    }
    Ok(())
}

/// Search bookmarks by field
pub fn search(catalog: &Catalog, query: String, field: String, output: &Output) -> Result<()> {
    let field = SearchField::from_str(&field).map_err(|e| anyhow::anyhow!(e))?;
    let results = catalog.search(&query, field).context("Search failed")?;
    output.print_bookmarks(&results);
    Ok(())
}

/// Record a visit and open the bookmark in the browser
pub fn visit(catalog: &mut Catalog, id: i64, no_open: bool, output: &Output) -> Result<()> {
    let Some(bookmark) = catalog.get_by_id(id).context("Failed to load bookmark")? else {
        bail!("Bookmark {} not found", id);
    };

    if !catalog.record_visit(id).context("Failed to record visit")? {
        bail!("Bookmark {} not found", id);
    }

    if !no_open {
        // Best effort: the visit is recorded even if the browser fails to open
        if let Err(e) = open::that(&bookmark.url) {
            warn!(error = %e, "failed to open browser");
            output.message(&format!("Could not open browser: {}", e));
        }
    }

    output.success(&format!("Visited {}", bookmark.url));
    Ok(())
}
