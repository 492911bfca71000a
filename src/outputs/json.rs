//! JSON rendering for reports and stored articles.
//!
//! Article JSON uses the presentation shape (`id`, `title`, `url`, `body`,
//! `source`, `scrapedAt`) with non-ASCII characters and slashes left as is.

use crate::error::ValidationError;
use crate::models::ArticleOutput;
use crate::report::ScrapeReport;
use serde::Serialize;
use serde_json::json;

pub fn report_to_json(report: &ScrapeReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

pub fn articles_to_json(articles: &[ArticleOutput]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(articles)
}

pub fn article_to_json(article: &ArticleOutput) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(article)
}

/// Error body with a message and per-field details.
pub fn error_to_json(message: &str, violations: Option<&ValidationError>) -> Result<String, serde_json::Error> {
    #[derive(Serialize)]
    struct ErrorBody<'a> {
        message: &'a str,
        errors: serde_json::Value,
    }

    let errors = match violations {
        Some(v) => json!(v.violations),
        None => json!({}),
    };
    serde_json::to_string_pretty(&ErrorBody { message, errors })
}
