//! The shared extraction pipeline.
//!
//! One [`SourceExtractor`] per publication, parameterized by its
//! [`SourceProfile`]. Selectors are parsed once at construction; an invalid
//! one is a configuration error.

use super::{Extract, ExtractionMode, SourceProfile};
use crate::error::{ConfigError, ExtractionFailure};
use crate::fetch::Fetch;
use crate::models::{ExtractedItem, SourceIdentifier};
use crate::utils::{normalize_whitespace, truncate_for_log};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// A front-page link that survived anchor and URL resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    url: String,
    link_text: String,
}

/// Extractor for one publication.
pub struct SourceExtractor<F> {
    profile: SourceProfile,
    fetcher: Arc<F>,
    article_limit: usize,
    mode: ExtractionMode,
    page_url: Url,
    link_selector: Selector,
    title_selector: Selector,
    body_selector: Selector,
}

impl<F: Fetch> SourceExtractor<F> {
    /// Build an extractor, validating the profile's URL and selectors.
    ///
    /// `article_limit` caps how many front-page candidates are considered per
    /// run and must be positive.
    pub fn new(
        profile: SourceProfile,
        fetcher: Arc<F>,
        article_limit: usize,
        mode: ExtractionMode,
    ) -> Result<Self, ConfigError> {
        if article_limit == 0 {
            return Err(ConfigError::InvalidLimit);
        }
        let page_url = Url::parse(&profile.scrape_url).map_err(|_| ConfigError::InvalidScrapeUrl {
            source_id: profile.identifier.to_string(),
            url: profile.scrape_url.clone(),
        })?;
        let parse = |selector: &str| {
            Selector::parse(selector).map_err(|_| ConfigError::InvalidSelector {
                source_id: profile.identifier.to_string(),
                selector: selector.to_string(),
            })
        };
        let link_selector = parse(&profile.link_selector)?;
        let title_selector = parse(&profile.title_selector)?;
        let body_selector = parse(&profile.body_selector)?;

        Ok(Self {
            profile,
            fetcher,
            article_limit,
            mode,
            page_url,
            link_selector,
            title_selector,
            body_selector,
        })
    }

    /// Select, resolve and deduplicate the candidate links of a front page.
    fn index_candidates(&self, html: &str) -> Vec<Candidate> {
        let document = Html::parse_document(html);
        document
            .select(&self.link_selector)
            .take(self.article_limit)
            .filter_map(|node| {
                // Layout noise without an enclosing link is expected; drop it quietly.
                let anchor = nearest_anchor(node)?;
                let href = anchor
                    .value()
                    .attr("href")
                    .map(str::trim)
                    .filter(|href| !href.is_empty())?;
                Some(Candidate {
                    url: resolve_url(&self.page_url, href),
                    link_text: normalize_whitespace(&node.text().collect::<String>()),
                })
            })
            .unique_by(|candidate| candidate.url.clone())
            .collect()
    }

    /// Turn one candidate into an item, or `None` if it must be skipped.
    async fn build_item(&self, candidate: Candidate) -> Option<ExtractedItem> {
        let Candidate { url, link_text } = candidate;

        if self.mode == ExtractionMode::Headlines {
            if link_text.is_empty() {
                debug!(%url, "Headline has no text; skipping");
                return None;
            }
            return Some(ExtractedItem {
                title: link_text,
                url,
                body: String::new(),
            });
        }

        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(
                    source = %self.profile.identifier,
                    %url,
                    error = %e,
                    "Failed to fetch article; skipping"
                );
                return None;
            }
        };

        let (title, body) = self.parse_article(&html);
        let title = if title.is_empty() { link_text } else { title };
        if title.is_empty() {
            debug!(%url, "Article has no title; skipping");
            return None;
        }

        debug!(%url, title = %truncate_for_log(&title, 80), bytes = body.len(), "Parsed article");
        Some(ExtractedItem { title, url, body })
    }

    /// Pull the title and blank-line separated body out of an article page.
    fn parse_article(&self, html: &str) -> (String, String) {
        let document = Html::parse_document(html);
        let title = document
            .select(&self.title_selector)
            .next()
            .map(|node| normalize_whitespace(&node.text().collect::<String>()))
            .unwrap_or_default();
        let body = document
            .select(&self.body_selector)
            .map(|node| normalize_whitespace(&node.text().collect::<String>()))
            .filter(|paragraph| !paragraph.is_empty())
            .join("\n\n")
            .trim()
            .to_string();
        (title, body)
    }
}

impl<F: Fetch> Extract for SourceExtractor<F> {
    fn identifier(&self) -> SourceIdentifier {
        self.profile.identifier
    }

    #[instrument(level = "info", skip_all, fields(source = %self.profile.identifier))]
    async fn extract(&self) -> Result<Vec<ExtractedItem>, ExtractionFailure> {
        let scrape_url = &self.profile.scrape_url;
        let html = self
            .fetcher
            .fetch(scrape_url)
            .await
            .map_err(|source| ExtractionFailure::Fetch {
                url: scrape_url.clone(),
                source,
            })?;

        let candidates = self.index_candidates(&html);
        info!(count = candidates.len(), url = %scrape_url, "Indexed front-page links");

        let items: Vec<ExtractedItem> = stream::iter(candidates)
            .then(|candidate| self.build_item(candidate))
            .filter_map(std::future::ready)
            .collect()
            .await;

        info!(count = items.len(), "Extracted items");
        Ok(items)
    }
}

/// The node itself if it is an `<a>`, otherwise its nearest `<a>` ancestor.
fn nearest_anchor(node: ElementRef<'_>) -> Option<ElementRef<'_>> {
    if node.value().name() == "a" {
        return Some(node);
    }
    node.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "a")
}

/// Make `href` absolute against the origin of the page it was found on.
///
/// Hrefs that already carry a scheme pass through untouched. Protocol-relative
/// hrefs borrow the page's scheme; everything else is prefixed with
/// `scheme://host[:port]`.
pub fn resolve_url(page_url: &Url, href: &str) -> String {
    if has_scheme(href) {
        return href.to_string();
    }
    if let Some(rest) = href.strip_prefix("//") {
        return format!("{}://{}", page_url.scheme(), rest);
    }

    let origin = match (page_url.host_str(), page_url.port()) {
        (Some(host), Some(port)) => format!("{}://{}:{}", page_url.scheme(), host, port),
        (Some(host), None) => format!("{}://{}", page_url.scheme(), host),
        (None, _) => page_url.as_str().trim_end_matches('/').to_string(),
    };
    if href.starts_with('/') {
        format!("{origin}{href}")
    } else {
        format!("{origin}/{href}")
    }
}

/// `scheme ":"` where scheme is `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
fn has_scheme(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
