//! marks CLI
//!
//! Command-line interface for marks - a personal bookmark catalog.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use marks_core::{Catalog, Config};

mod commands;
mod metadata;
mod output;
mod prompt;
mod validate;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "marks")]
#[command(about = "marks - personal bookmark catalog")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new bookmark
    Add {
        /// URL to save
        url: String,
        /// Bookmark title (fetched from the page when omitted)
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Tags to add
        #[arg(short, long)]
        tag: Vec<String>,
        /// Skip fetching the page title
        #[arg(long)]
        no_fetch: bool,
    },
    /// List all bookmarks
    #[command(alias = "ls")]
    List,
    /// Show bookmark details
    Show {
        /// Bookmark id
        id: i64,
    },
    /// Edit a bookmark interactively
    Edit {
        /// Bookmark id
        id: i64,
    },
    /// Delete a bookmark
    #[command(alias = "rm")]
    Delete {
        /// Bookmark id
        id: i64,
    },
    /// Search bookmarks
    Search {
        /// Search query (substring, case-insensitive)
        query: String,
        /// Field to search: title, url, tags, description, or all
        #[arg(short, long, default_value = "all")]
        field: String,
    },
    /// Record a visit and open the bookmark in the browser
    Visit {
        /// Bookmark id
        id: i64,
        /// Record the visit without opening the browser
        #[arg(long)]
        no_open: bool,
    },
    /// List all tags with usage counts
    Tags,
    /// Show catalog statistics
    Stats,
    /// Export all bookmarks to a JSON file
    Export {
        /// Destination path
        path: PathBuf,
    },
    /// Import bookmarks from a JSON file
    Import {
        /// Source path
        path: PathBuf,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the catalog
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let config = Config::load().context("Failed to load configuration")?;
    let mut catalog =
        Catalog::open(config.db_path()).context("Failed to open bookmark catalog")?;

    match cli.command {
        Commands::Add {
            url,
            title,
            description,
            tag,
            no_fetch,
        } => commands::bookmark::add(&mut catalog, url, title, description, tag, no_fetch, &output)
            .await,
        Commands::List => commands::bookmark::list(&catalog, &output),
        Commands::Show { id } => commands::bookmark::show(&catalog, id, &output),
        Commands::Edit { id } => commands::bookmark::edit(&mut catalog, id, &output),
        Commands::Delete { id } => commands::bookmark::delete(&mut catalog, id, &output),
        Commands::Search { query, field } => {
            commands::bookmark::search(&catalog, query, field, &output)
        }
        Commands::Visit { id, no_open } => {
            commands::bookmark::visit(&mut catalog, id, no_open, &output)
        }
        Commands::Tags => commands::tag::list(&catalog, &output),
        Commands::Stats => commands::stats::show(&catalog, &config, &output),
        Commands::Export { path } => commands::exchange::export(&catalog, &path, &output),
        Commands::Import { path } => commands::exchange::import(&mut catalog, &path, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}

/// Initialize stderr logging, filtered via MARKS_LOG
fn init_logging() {
    let filter = EnvFilter::try_from_env("MARKS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
