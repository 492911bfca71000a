//! Command-line interface definitions.
//!
//! Global options can also come from the environment, so a scheduled job
//! only needs `press_scraper scrape`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Scrape news front pages into a deduplicated article collection.
///
/// # Examples
///
/// ```sh
/// # Scrape every configured source and print the report
/// press_scraper scrape
///
/// # Headlines only, at most 5 per source, JSON report
/// press_scraper --store ./data/articles.json scrape --headlines-only --limit 5 --json
///
/// # Add an article by hand
/// press_scraper add --title "Nota" --url https://example.com/nota --body "Texto"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true, env = "PRESS_SCRAPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Article store file (overrides `store_path` from the config)
    #[arg(short, long, global = true, env = "PRESS_SCRAPER_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every registered scraper and store new articles
    Scrape(ScrapeArgs),
    /// Print every stored article as JSON
    List,
    /// Print one stored article as JSON
    Show {
        /// Article id
        id: u64,
    },
    /// Store an article entered by hand
    Add(AddArgs),
}

#[derive(Args, Debug)]
pub struct ScrapeArgs {
    /// Maximum links considered per source (overrides `article_limit`)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Only collect front-page headlines; do not fetch article bodies
    #[arg(long)]
    pub headlines_only: bool,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub body: Option<String>,
}
