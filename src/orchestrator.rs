//! Runs every registered extractor and reconciles their output with the store.
//!
//! # Outcomes per extractor
//!
//! | Extraction | Report entry | Log level | Persistence |
//! |------------|--------------|-----------|-------------|
//! | `Err(cause)` | `errors[id] = "An error occurred during scraping: <cause>"` | error | none |
//! | `Ok([])` | `errors[id] = "No articles were found. ..."` | warn | none |
//! | `Ok(items)` | `results[id] = {items, count}` | info | new URLs queued |
//!
//! Extractors run one after another in registration order. All queued drafts
//! are flushed once at the end; a store failure is the only error that
//! escapes [`ScrapeOrchestrator::run_all`].

use crate::error::StoreError;
use crate::models::{ExtractedItem, NewArticle, SourceIdentifier};
use crate::report::ScrapeReport;
use crate::scrapers::Extract;
use crate::store::ArticleStore;
use chrono::Utc;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

pub struct ScrapeOrchestrator<E, S> {
    extractors: Vec<E>,
    store: S,
}

impl<E: Extract, S: ArticleStore> ScrapeOrchestrator<E, S> {
    pub fn new(extractors: Vec<E>, store: S) -> Self {
        Self { extractors, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run every extractor, persist new articles and build the report.
    #[instrument(level = "info", skip_all, fields(extractors = self.extractors.len()))]
    pub async fn run_all(&mut self) -> Result<ScrapeReport, StoreError> {
        let t0 = Instant::now();
        let mut report = ScrapeReport::default();
        // URLs queued earlier in this run; the store cannot see them before flush.
        let mut queued: HashSet<String> = HashSet::new();

        for extractor in &self.extractors {
            let id = extractor.identifier();
            match extractor.extract().await {
                Err(e) => {
                    error!(source = %id, error = %e, "Scraping failed.");
                    report.record_failure(id, &e);
                }
                Ok(items) if items.is_empty() => {
                    warn!(source = %id, "No articles found.");
                    report.record_empty(id);
                }
                Ok(items) => {
                    let persisted = queue_new(&mut self.store, &mut queued, id, &items).await?;
                    info!(
                        source = %id,
                        count = items.len(),
                        persisted,
                        "Successfully scraped and processed {} articles.",
                        items.len()
                    );
                    report.record_success(id, items);
                }
            }
        }

        let written = self.store.flush().await?;
        info!(
            results = report.results_len(),
            errors = report.errors_len(),
            written,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Scrape run complete"
        );
        Ok(report)
    }
}

/// Queue every item whose URL is neither stored nor already queued this run.
async fn queue_new<S: ArticleStore>(
    store: &mut S,
    queued: &mut HashSet<String>,
    source: SourceIdentifier,
    items: &[ExtractedItem],
) -> Result<usize, StoreError> {
    let mut persisted = 0;
    for item in items {
        if queued.contains(&item.url) || store.find_by_url(&item.url).await?.is_some() {
            continue;
        }
        store.insert(NewArticle::from_item(item, source, Utc::now()));
        queued.insert(item.url.clone());
        persisted += 1;
    }
    Ok(persisted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NO_ARTICLES_MESSAGE;
    use crate::test_support::{CountingStore, ScriptedExtractor, capture_logs, item};
    use tracing::Level;

    #[tokio::test]
    async fn test_two_sources_both_persisted_with_single_flush() {
        let extractors = vec![
            ScriptedExtractor::items(SourceIdentifier::ElMundo, vec![item("Title 1", "http://example.com/1")]),
            ScriptedExtractor::items(SourceIdentifier::ElPais, vec![item("Title 2", "http://example.com/2")]),
        ];
        let mut orchestrator = ScrapeOrchestrator::new(extractors, CountingStore::default());

        let report = orchestrator.run_all().await.unwrap();

        assert_eq!(report.results_len(), 2);
        assert_eq!(report.errors_len(), 0);
        assert_eq!(report.result(SourceIdentifier::ElMundo).unwrap().count, 1);
        assert_eq!(report.result(SourceIdentifier::ElMundo).unwrap().items[0].title, "Title 1");
        assert_eq!(report.result(SourceIdentifier::ElPais).unwrap().count, 1);

        let store = orchestrator.store();
        assert_eq!(store.inserts, 2);
        assert_eq!(store.flushes, 1);
        let stored = store.inner.all();
        assert_eq!(stored[0].source, SourceIdentifier::ElMundo);
        assert_eq!(stored[1].source, SourceIdentifier::ElPais);
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let extractors = vec![ScriptedExtractor::items(
            SourceIdentifier::ElMundo,
            vec![item("A", "http://example.com/a"), item("B", "http://example.com/b")],
        )];
        let mut orchestrator = ScrapeOrchestrator::new(extractors, CountingStore::default());

        orchestrator.run_all().await.unwrap();
        let second = orchestrator.run_all().await.unwrap();

        assert_eq!(second.result(SourceIdentifier::ElMundo).unwrap().count, 2);
        let store = orchestrator.store();
        assert_eq!(store.inserts, 2);
        assert_eq!(store.flushes, 2);
        assert_eq!(store.inner.all().len(), 2);
    }

    #[tokio::test]
    async fn test_existing_url_is_skipped_but_counted() {
        let mut store = CountingStore::default();
        store.inner.insert(NewArticle::from_item(
            &item("Existing", "http://example.com/existing"),
            SourceIdentifier::Api,
            Utc::now(),
        ));
        store.inner.flush().await.unwrap();

        let extractors = vec![ScriptedExtractor::items(
            SourceIdentifier::ElMundo,
            vec![item("Existing Title", "http://example.com/existing")],
        )];
        let mut orchestrator = ScrapeOrchestrator::new(extractors, store);
        let report = orchestrator.run_all().await.unwrap();

        assert_eq!(report.result(SourceIdentifier::ElMundo).unwrap().count, 1);
        assert_eq!(orchestrator.store().inserts, 0);
        assert_eq!(orchestrator.store().flushes, 1);
    }

    #[tokio::test]
    async fn test_same_url_from_two_sources_is_queued_once() {
        let extractors = vec![
            ScriptedExtractor::items(SourceIdentifier::ElMundo, vec![item("A", "http://example.com/shared")]),
            ScriptedExtractor::items(SourceIdentifier::ElPais, vec![item("A", "http://example.com/shared")]),
        ];
        let mut orchestrator = ScrapeOrchestrator::new(extractors, CountingStore::default());
        let report = orchestrator.run_all().await.unwrap();

        assert_eq!(report.results_len(), 2);
        assert_eq!(orchestrator.store().inserts, 1);
        assert_eq!(orchestrator.store().inner.all()[0].source, SourceIdentifier::ElMundo);
    }

    #[tokio::test]
    async fn test_failure_is_contained_to_its_source() {
        let extractors = vec![
            ScriptedExtractor::failing(SourceIdentifier::ElMundo, 503),
            ScriptedExtractor::items(SourceIdentifier::ElPais, vec![item("B", "http://example.com/b")]),
        ];
        let mut orchestrator = ScrapeOrchestrator::new(extractors, CountingStore::default());

        let (logs, report) = capture_logs(orchestrator.run_all()).await;
        let report = report.unwrap();

        assert_eq!(
            report.error(SourceIdentifier::ElMundo),
            Some("An error occurred during scraping: Failed to fetch content from https://elmundo.test/: HTTP status 503")
        );
        assert!(report.result(SourceIdentifier::ElMundo).is_none());
        assert_eq!(report.result(SourceIdentifier::ElPais).unwrap().count, 1);
        assert_eq!(orchestrator.store().inner.all().len(), 1);

        let failure = logs.iter().find(|e| e.level == Level::ERROR).unwrap();
        assert_eq!(failure.message(), "Scraping failed.");
        assert_eq!(failure.field("source").as_deref(), Some("elmundo"));
    }

    #[tokio::test]
    async fn test_success_log_reports_count_and_persisted() {
        let mut store = CountingStore::default();
        store.inner.insert(NewArticle::from_item(
            &item("Old", "http://example.com/old"),
            SourceIdentifier::Api,
            Utc::now(),
        ));
        store.inner.flush().await.unwrap();

        let extractors = vec![ScriptedExtractor::items(
            SourceIdentifier::ElPais,
            vec![item("Old", "http://example.com/old"), item("New", "http://example.com/new")],
        )];
        let mut orchestrator = ScrapeOrchestrator::new(extractors, store);

        let (logs, report) = capture_logs(orchestrator.run_all()).await;
        report.unwrap();

        let success = logs
            .iter()
            .find(|e| e.level == Level::INFO && e.field("source").as_deref() == Some("elpais"))
            .unwrap();
        assert_eq!(success.message(), "Successfully scraped and processed 2 articles.");
        assert_eq!(success.field("count").as_deref(), Some("2"));
        assert_eq!(success.field("persisted").as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_empty_result_is_a_soft_error() {
        let extractors = vec![ScriptedExtractor::items(SourceIdentifier::ElMundo, vec![])];
        let mut orchestrator = ScrapeOrchestrator::new(extractors, CountingStore::default());

        let (logs, report) = capture_logs(orchestrator.run_all()).await;
        let report = report.unwrap();

        assert_eq!(report.results_len(), 0);
        assert_eq!(report.error(SourceIdentifier::ElMundo), Some(NO_ARTICLES_MESSAGE));
        assert_eq!(orchestrator.store().inserts, 0);
        assert_eq!(orchestrator.store().flushes, 1);

        let warnings: Vec<_> = logs.iter().filter(|e| e.level == Level::WARN).collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message(), "No articles found.");
        assert!(logs.iter().all(|e| e.level != Level::ERROR));
    }

    #[tokio::test]
    async fn test_report_covers_every_extractor_once() {
        let extractors = vec![
            ScriptedExtractor::items(SourceIdentifier::ElMundo, vec![]),
            ScriptedExtractor::failing(SourceIdentifier::ElPais, 500),
            ScriptedExtractor::items(SourceIdentifier::Api, vec![item("C", "http://example.com/c")]),
        ];
        let n = extractors.len();
        let mut orchestrator = ScrapeOrchestrator::new(extractors, CountingStore::default());
        let report = orchestrator.run_all().await.unwrap();

        assert_eq!(report.results_len() + report.errors_len(), n);
        for (id, _) in report.results() {
            assert!(report.error(id).is_none());
        }
        let error_order: Vec<_> = report.errors().map(|(id, _)| id).collect();
        assert_eq!(error_order, vec![SourceIdentifier::ElMundo, SourceIdentifier::ElPais]);
    }

    #[tokio::test]
    async fn test_flush_failure_propagates() {
        let store = CountingStore {
            fail_flush: true,
            ..CountingStore::default()
        };
        let extractors = vec![ScriptedExtractor::items(
            SourceIdentifier::ElPais,
            vec![item("A", "http://example.com/a")],
        )];
        let mut orchestrator = ScrapeOrchestrator::new(extractors, store);

        assert!(matches!(orchestrator.run_all().await, Err(StoreError::Io(_))));
        assert!(orchestrator.store().inner.all().is_empty());
    }
}
