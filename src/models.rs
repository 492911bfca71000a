//! Data models for scraped and stored articles.
//!
//! - [`SourceIdentifier`]: closed set of publication tags plus the manual-entry sentinel
//! - [`ExtractedItem`]: what a source extractor produces on every run
//! - [`NewArticle`]: a draft queued for insertion into the store
//! - [`StoredArticle`]: the persisted, deduplicated record
//! - [`ArticleOutput`] / [`ArticleInput`]: the shapes shown to and accepted from users

use crate::error::ValidationError;
use crate::utils::collapse_blank_lines;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag identifying where an article came from.
///
/// The string values are persisted, so they must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceIdentifier {
    ElMundo,
    ElPais,
    /// Articles entered by hand rather than scraped.
    Api,
}

impl SourceIdentifier {
    pub const ALL: [SourceIdentifier; 3] = [
        SourceIdentifier::ElMundo,
        SourceIdentifier::ElPais,
        SourceIdentifier::Api,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceIdentifier::ElMundo => "elmundo",
            SourceIdentifier::ElPais => "elpais",
            SourceIdentifier::Api => "api",
        }
    }
}

impl fmt::Display for SourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceIdentifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceIdentifier::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown source `{s}`"))
    }
}

/// An article (or headline) as extracted from a publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedItem {
    pub title: String,
    /// Always absolute.
    pub url: String,
    /// Paragraphs separated by blank lines; empty in headline-only mode.
    pub body: String,
}

/// Draft queued for insertion. The store assigns the id on flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub url: String,
    pub body: String,
    pub source: SourceIdentifier,
    pub scraped_at: DateTime<Utc>,
}

impl NewArticle {
    pub fn from_item(item: &ExtractedItem, source: SourceIdentifier, scraped_at: DateTime<Utc>) -> Self {
        Self {
            title: item.title.clone(),
            url: item.url.clone(),
            body: item.body.clone(),
            source,
            scraped_at,
        }
    }
}

/// A persisted article. URLs are unique across the collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoredArticle {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub body: String,
    pub source: SourceIdentifier,
    pub scraped_at: DateTime<Utc>,
}

impl StoredArticle {
    pub fn from_draft(id: u64, draft: NewArticle) -> Self {
        Self {
            id,
            title: draft.title,
            url: draft.url,
            body: draft.body,
            source: draft.source,
            scraped_at: draft.scraped_at,
        }
    }
}

/// Presentation shape of a stored article.
///
/// The body has runs of blank lines collapsed, and `scrapedAt` uses
/// `YYYY-MM-DD HH:MM:SS`, matching what existing consumers read.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleOutput {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub body: String,
    pub source: SourceIdentifier,
    pub scrapedAt: String,
}

impl From<&StoredArticle> for ArticleOutput {
    fn from(article: &StoredArticle) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            url: article.url.clone(),
            body: collapse_blank_lines(&article.body),
            source: article.source,
            scrapedAt: article.scraped_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

const MAX_FIELD_LEN: usize = 255;
const BLANK: &str = "This value should not be blank.";

/// A manually entered article.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleInput {
    pub title: Option<String>,
    pub url: Option<String>,
    pub body: Option<String>,
}

impl ArticleInput {
    /// Check every field, collecting all violations rather than stopping at the first.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();

        match self.title.as_deref().map(str::trim) {
            None | Some("") => errors.add("title", BLANK),
            Some(t) if t.chars().count() > MAX_FIELD_LEN => errors.add("title", too_long()),
            Some(_) => {}
        }

        match self.url.as_deref().map(str::trim) {
            None | Some("") => errors.add("url", BLANK),
            Some(u) => {
                if u.chars().count() > MAX_FIELD_LEN {
                    errors.add("url", too_long());
                }
                let valid = url::Url::parse(u)
                    .map(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.has_host())
                    .unwrap_or(false);
                if !valid {
                    errors.add("url", "This value is not a valid URL.");
                }
            }
        }

        if self.body.as_deref().map(str::trim).unwrap_or("").is_empty() {
            errors.add("body", BLANK);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn too_long() -> String {
    format!("This value is too long. It should have {MAX_FIELD_LEN} characters or less.")
}
