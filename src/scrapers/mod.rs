//! News source extractors.
//!
//! Every publication is scraped by the same pipeline ([`pipeline`]); what
//! differs between sources is pure configuration, captured in a
//! [`SourceProfile`]:
//!
//! | Source | Module | Front page |
//! |--------|--------|------------|
//! | El Mundo | [`elmundo`] | `https://www.elmundo.es/` |
//! | El País | [`elpais`] | `https://elpais.com` |
//!
//! The pipeline runs in two phases, like any front-page scraper:
//!
//! 1. **Indexing**: fetch the front page, select candidate links, resolve them to absolute URLs
//! 2. **Fetching**: fetch each article and pull out its title and body paragraphs
//!
//! A front-page failure aborts the source; a failed article is logged and skipped.
//! Adding a source means adding a [`SourceIdentifier`] variant, which the
//! compiler then forces into [`profile_for`].

pub mod elmundo;
pub mod elpais;
pub mod pipeline;

use crate::error::{ConfigError, ExtractionFailure};
use crate::fetch::Fetch;
use crate::models::{ExtractedItem, SourceIdentifier};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use pipeline::SourceExtractor;

/// Produces the items of one publication for one run.
pub trait Extract {
    /// The tag under which results are reported and stored.
    fn identifier(&self) -> SourceIdentifier;

    /// Scrape the publication.
    ///
    /// Fails only when the front page itself cannot be fetched. An empty
    /// vector is a valid outcome.
    async fn extract(&self) -> Result<Vec<ExtractedItem>, ExtractionFailure>;
}

/// Whether article pages are fetched for their title and body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Follow every link and extract the article title and body.
    #[default]
    Full,
    /// Use the front-page link text as title and leave the body empty.
    Headlines,
}

/// Selector configuration for one publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceProfile {
    pub identifier: SourceIdentifier,
    /// Front page to index.
    pub scrape_url: String,
    /// Selects candidate link nodes on the front page.
    pub link_selector: String,
    /// Selects the headline on an article page.
    pub title_selector: String,
    /// Selects the body paragraphs on an article page.
    pub body_selector: String,
}

/// Built-in profile for a source, or `None` for tags that are never scraped.
pub fn profile_for(id: SourceIdentifier) -> Option<SourceProfile> {
    match id {
        SourceIdentifier::ElMundo => Some(elmundo::profile()),
        SourceIdentifier::ElPais => Some(elpais::profile()),
        SourceIdentifier::Api => None,
    }
}

/// Build one extractor per requested source, in the given order.
///
/// All extractors share the same fetcher, per-run item limit and mode. Each
/// source may appear once, since the report is keyed by identifier.
pub fn build_extractors<F: Fetch>(
    sources: &[SourceIdentifier],
    fetcher: Arc<F>,
    article_limit: usize,
    mode: ExtractionMode,
) -> Result<Vec<SourceExtractor<F>>, ConfigError> {
    if let Some(id) = sources.iter().duplicates().next() {
        return Err(ConfigError::DuplicateSource(id.to_string()));
    }
    sources
        .iter()
        .map(|&id| {
            let profile = profile_for(id).ok_or_else(|| ConfigError::UnsupportedSource(id.to_string()))?;
            SourceExtractor::new(profile, Arc::clone(&fetcher), article_limit, mode)
        })
        .collect()
}
