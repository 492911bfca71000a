//! Per-run scrape report.
//!
//! Every registered extractor lands in exactly one of `results` or `errors`.
//! Both keep registration order, which is also the order they serialize in.

use crate::models::{ExtractedItem, SourceIdentifier};
use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

/// Message recorded when an extractor returns no items.
pub const NO_ARTICLES_MESSAGE: &str =
    "No articles were found. The website structure might have changed or the selector is wrong.";

/// Prefix of the message recorded when an extractor fails.
pub const SCRAPE_ERROR_PREFIX: &str = "An error occurred during scraping: ";

/// Items one extractor produced, before deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResult {
    pub items: Vec<ExtractedItem>,
    /// Extracted count, independent of how many were new to the store.
    pub count: usize,
}

impl SourceResult {
    pub fn new(items: Vec<ExtractedItem>) -> Self {
        let count = items.len();
        Self { items, count }
    }
}

impl Serialize for SourceResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SourceResult", 2)?;
        state.serialize_field("articles", &self.items)?;
        state.serialize_field("count", &self.count)?;
        state.end()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScrapeReport {
    results: Vec<(SourceIdentifier, SourceResult)>,
    errors: Vec<(SourceIdentifier, String)>,
}

impl ScrapeReport {
    /// Record a successful extraction, replacing any earlier outcome for `id`.
    pub fn record_success(&mut self, id: SourceIdentifier, items: Vec<ExtractedItem>) {
        self.forget(id);
        self.results.push((id, SourceResult::new(items)));
    }

    /// Record an empty extraction as a soft error.
    pub fn record_empty(&mut self, id: SourceIdentifier) {
        self.record_error(id, NO_ARTICLES_MESSAGE.to_string());
    }

    /// Record a failed extraction with its cause.
    pub fn record_failure(&mut self, id: SourceIdentifier, cause: &dyn std::fmt::Display) {
        self.record_error(id, format!("{SCRAPE_ERROR_PREFIX}{cause}"));
    }

    fn record_error(&mut self, id: SourceIdentifier, message: String) {
        self.forget(id);
        self.errors.push((id, message));
    }

    fn forget(&mut self, id: SourceIdentifier) {
        self.results.retain(|(k, _)| *k != id);
        self.errors.retain(|(k, _)| *k != id);
    }

    pub fn results(&self) -> impl Iterator<Item = (SourceIdentifier, &SourceResult)> {
        self.results.iter().map(|(id, r)| (*id, r))
    }

    pub fn errors(&self) -> impl Iterator<Item = (SourceIdentifier, &str)> {
        self.errors.iter().map(|(id, m)| (*id, m.as_str()))
    }

    pub fn result(&self, id: SourceIdentifier) -> Option<&SourceResult> {
        self.results.iter().find(|(k, _)| *k == id).map(|(_, r)| r)
    }

    pub fn error(&self, id: SourceIdentifier) -> Option<&str> {
        self.errors.iter().find(|(k, _)| *k == id).map(|(_, m)| m.as_str())
    }

    pub fn results_len(&self) -> usize {
        self.results.len()
    }

    pub fn errors_len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.errors.is_empty()
    }
}

struct OrderedMap<'a, V>(&'a [(SourceIdentifier, V)]);

impl<V: Serialize> Serialize for OrderedMap<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, value) in self.0 {
            map.serialize_entry(id.as_str(), value)?;
        }
        map.end()
    }
}

impl Serialize for ScrapeReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ScrapeReport", 2)?;
        state.serialize_field("results", &OrderedMap(&self.results))?;
        state.serialize_field("errors", &OrderedMap(&self.errors))?;
        state.end()
    }
}
