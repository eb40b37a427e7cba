//! Config commands

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use marks_core::Config;

use crate::output::{Output, OutputFormat};

/// Show the current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "config_file": Config::config_file_path(),
                })
            );
        }
        _ => {
            println!("data_dir:    {}", config.data_dir.display());
            println!("config file: {}", Config::config_file_path().display());
        }
    }
    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    match key.as_str() {
        "data_dir" => {
            config.data_dir = PathBuf::from(&value);
        }
        _ => bail!("Unknown configuration key: {} (expected data_dir)", key),
    }

    config
        .save_to_path(&Config::config_file_path())
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));
    Ok(())
}
