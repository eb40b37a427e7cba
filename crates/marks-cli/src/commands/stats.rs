//! Stats command

use anyhow::{Context, Result};
use marks_core::{Catalog, Config};

use crate::output::{Output, OutputFormat};

/// Show catalog statistics
pub fn show(catalog: &Catalog, config: &Config, output: &Output) -> Result<()> {
    let stats = catalog.stats().context("Failed to compute statistics")?;

    output.print_stats(&stats);

    if output.format == OutputFormat::Human {
        println!();
        println!("Database:        {}", config.db_path().display());
    }

    Ok(())
}
