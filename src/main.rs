//! # Press Scraper
//!
//! Scrapes the front pages of news publications, follows each headline to
//! its article, and reconciles the results with a deduplicated article
//! collection stored as JSON.
//!
//! ## Usage
//!
//! ```sh
//! press_scraper scrape
//! press_scraper list
//! press_scraper show 12
//! press_scraper add --title "Nota" --url https://example.com/nota --body "Texto"
//! ```
//!
//! ## Architecture
//!
//! 1. **Extraction**: one [`scrapers::SourceExtractor`] per publication, all driven by the same pipeline
//! 2. **Orchestration**: [`orchestrator::ScrapeOrchestrator`] runs them in order and deduplicates by URL
//! 3. **Persistence**: new articles are flushed to the store once, at the end of the run
//! 4. **Output**: the per-source report is printed as text or JSON

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod articles;
mod cli;
mod config;
mod error;
mod fetch;
mod models;
mod orchestrator;
mod outputs;
mod report;
mod scrapers;
mod store;
#[cfg(test)]
mod test_support;
mod utils;

use cli::{AddArgs, Cli, Command, ScrapeArgs};
use config::AppConfig;
use error::ArticleError;
use fetch::ReqwestFetcher;
use models::ArticleInput;
use orchestrator::ScrapeOrchestrator;
use outputs::{console, json};
use scrapers::ExtractionMode;
use store::JsonArticleStore;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    // Logs go to stderr so stdout carries only the report or JSON.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(store_path) = args.store {
        config.store_path = store_path;
    }

    match args.command {
        Command::Scrape(scrape_args) => scrape(config, scrape_args).await,
        Command::List => {
            let store = JsonArticleStore::open(&config.store_path).await?;
            println!("{}", json::articles_to_json(&articles::list(&store))?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Show { id } => {
            let store = JsonArticleStore::open(&config.store_path).await?;
            match articles::get(&store, id) {
                Ok(article) => {
                    println!("{}", json::article_to_json(&article)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => report_article_error(e),
            }
        }
        Command::Add(add_args) => add(config, add_args).await,
    }
}

/// Run every configured scraper, persist new articles and print the report.
#[instrument(level = "info", skip_all)]
async fn scrape(mut config: AppConfig, args: ScrapeArgs) -> Result<ExitCode, Box<dyn Error>> {
    let start_time = std::time::Instant::now();

    if let Some(limit) = args.limit {
        config.article_limit = limit;
    }
    if args.headlines_only {
        config.mode = ExtractionMode::Headlines;
    }
    config.validate()?;
    info!(
        sources = ?config.sources,
        limit = config.article_limit,
        mode = ?config.mode,
        store = %config.store_path.display(),
        "Starting scrape run"
    );

    let fetcher = Arc::new(ReqwestFetcher::new(&config.http.user_agent, config.http.timeout())?);
    let extractors =
        scrapers::build_extractors(&config.sources, fetcher, config.article_limit, config.mode)?;
    let store = JsonArticleStore::open(&config.store_path).await?;

    let mut orchestrator = ScrapeOrchestrator::new(extractors, store);
    let report = orchestrator.run_all().await?;

    if args.json {
        println!("{}", json::report_to_json(&report)?);
    } else {
        print!("{}", console::render_report(&report));
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        stored_total = orchestrator.store().all().len(),
        path = %orchestrator.store().path().display(),
        "Execution complete"
    );
    Ok(ExitCode::SUCCESS)
}

/// Validate and store a manually entered article, printing it as JSON.
async fn add(config: AppConfig, args: AddArgs) -> Result<ExitCode, Box<dyn Error>> {
    let mut store = JsonArticleStore::open(&config.store_path).await?;
    let input = ArticleInput {
        title: args.title,
        url: args.url,
        body: args.body,
    };
    match articles::create(&mut store, input).await {
        Ok(article) => {
            println!("{}", json::article_to_json(&article)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => report_article_error(e),
    }
}

/// Print a user-facing error body; store failures stay fatal.
fn report_article_error(e: ArticleError) -> Result<ExitCode, Box<dyn Error>> {
    let body = match &e {
        ArticleError::Validation(violations) => json::error_to_json(&e.to_string(), Some(violations))?,
        ArticleError::DuplicateUrl(_) | ArticleError::NotFound(_) => json::error_to_json(&e.to_string(), None)?,
        ArticleError::Store(_) => return Err(Box::new(e)),
    };
    warn!(error = %e, "Request rejected");
    println!("{body}");
    Ok(ExitCode::FAILURE)
}
