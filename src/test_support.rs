//! Fakes shared by the unit tests: a canned-page fetcher, scripted
//! extractors, an in-memory store wrapper that can fail on flush, and a
//! `tracing` layer that records events.

use crate::error::{ExtractionFailure, FetchError, StoreError};
use crate::fetch::Fetch;
use crate::models::{ExtractedItem, NewArticle, SourceIdentifier, StoredArticle};
use crate::scrapers::Extract;
use crate::store::{ArticleStore, MemoryArticleStore};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Serves canned bodies by URL; unknown URLs answer 404.
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, Result<String, u16>>,
    requests: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn with_failure(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), Err(status));
        self
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Fetch for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(FetchError::Status { status: *status }),
            None => Err(FetchError::Status { status: 404 }),
        }
    }
}

/// Extractor returning a fixed outcome on every call.
pub struct ScriptedExtractor {
    id: SourceIdentifier,
    outcome: Result<Vec<ExtractedItem>, u16>,
}

impl ScriptedExtractor {
    pub fn items(id: SourceIdentifier, items: Vec<ExtractedItem>) -> Self {
        Self { id, outcome: Ok(items) }
    }

    /// Fails as if the front page answered with `status`.
    pub fn failing(id: SourceIdentifier, status: u16) -> Self {
        Self { id, outcome: Err(status) }
    }
}

impl Extract for ScriptedExtractor {
    fn identifier(&self) -> SourceIdentifier {
        self.id
    }

    async fn extract(&self) -> Result<Vec<ExtractedItem>, ExtractionFailure> {
        match &self.outcome {
            Ok(items) => Ok(items.clone()),
            Err(status) => Err(ExtractionFailure::Fetch {
                url: format!("https://{}.test/", self.id),
                source: FetchError::Status { status: *status },
            }),
        }
    }
}

pub fn item(title: &str, url: &str) -> ExtractedItem {
    ExtractedItem {
        title: title.to_string(),
        url: url.to_string(),
        body: format!("Body of {title}"),
    }
}

/// Memory store that counts calls and can be told to fail on flush.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryArticleStore,
    pub inserts: usize,
    pub flushes: usize,
    pub fail_flush: bool,
}

impl ArticleStore for CountingStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<StoredArticle>, StoreError> {
        self.inner.find_by_url(url).await
    }

    fn insert(&mut self, draft: NewArticle) {
        self.inserts += 1;
        self.inner.insert(draft);
    }

    async fn flush(&mut self) -> Result<usize, StoreError> {
        self.flushes += 1;
        if self.fail_flush {
            return Err(StoreError::Io(std::io::Error::other("disk full")));
        }
        self.inner.flush().await
    }
}

/// One recorded `tracing` event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    pub fn message(&self) -> String {
        self.field("message").unwrap_or_default()
    }
}

struct FieldRecorder<'a>(&'a mut HashMap<String, String>);

impl Visit for FieldRecorder<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut FieldRecorder(&mut fields));
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields,
        });
    }
}

/// Run `fut` with a thread-local subscriber and return every event it emitted.
pub async fn capture_logs<T>(fut: impl Future<Output = T>) -> (Vec<CapturedEvent>, T) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer {
        events: Arc::clone(&events),
    });
    let guard = tracing::subscriber::set_default(subscriber);
    let out = fut.await;
    drop(guard);
    let captured = events.lock().unwrap().clone();
    (captured, out)
}
