//! Error types for fetching, extraction, storage, configuration and manual entry.
//!
//! Extraction problems never escape the orchestrator: they are folded into the
//! [`ScrapeReport`](crate::report::ScrapeReport). Only [`StoreError`] propagates
//! out of a scrape run.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Transport-level failure reported by the fetch port.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("HTTP status {status}")]
    Status { status: u16 },
}

/// Failure that aborts a whole source extractor for this run.
#[derive(Error, Debug)]
pub enum ExtractionFailure {
    /// The publication's front page could not be fetched.
    #[error("Failed to fetch content from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
}

/// Errors raised by an [`ArticleStore`](crate::store::ArticleStore).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A queued draft collides with a stored article or another draft.
    #[error("an article with URL {0} already exists")]
    DuplicateUrl(String),

    /// The store file holds two articles with the same id.
    #[error("store file holds more than one article with id {0}")]
    DuplicateId(u64),
}

/// Errors loading or validating the runtime configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("article_limit must be a positive integer")]
    InvalidLimit,

    #[error("`{0}` is not a scrapable source")]
    UnsupportedSource(String),

    #[error("source `{0}` is listed more than once")]
    DuplicateSource(String),

    #[error("invalid selector `{selector}` for source {source_id}")]
    InvalidSelector { source_id: String, selector: String },

    #[error("invalid front-page URL `{url}` for source {source_id}")]
    InvalidScrapeUrl { source_id: String, url: String },

    #[error("cannot build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Field-level validation failures for manually entered articles.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ValidationError {
    /// Field name to human-readable message.
    pub violations: BTreeMap<&'static str, String>,
}

impl ValidationError {
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.violations.entry(field).or_insert_with(|| message.into());
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validation failed.")
    }
}

impl std::error::Error for ValidationError {}

/// Errors from the manual-entry article service.
#[derive(Error, Debug)]
pub enum ArticleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("an article with URL {0} already exists")]
    DuplicateUrl(String),

    #[error("Article not found")]
    NotFound(u64),

    #[error(transparent)]
    Store(#[from] StoreError),
}
