//! Tag commands

use anyhow::{Context, Result};
use marks_core::Catalog;

use crate::output::Output;

/// List all tags with usage counts
pub fn list(catalog: &Catalog, output: &Output) -> Result<()> {
    let tags = catalog.tags_with_counts().context("Failed to list tags")?;
    output.print_tags(&tags);
    Ok(())
}
