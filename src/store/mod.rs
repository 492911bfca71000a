//! Article persistence.
//!
//! The scrape run needs only two things from storage: "is this URL already
//! stored?" and "queue this draft". Queued drafts become visible only after a
//! single [`ArticleStore::flush`], so a run that dies before flushing leaves
//! the collection untouched.
//!
//! - [`MemoryArticleStore`]: process-local collection
//! - [`JsonArticleStore`]: collection persisted as a JSON array on disk

pub mod json;

use crate::error::StoreError;
use crate::models::{NewArticle, StoredArticle};
use std::collections::{HashMap, HashSet};

pub use json::JsonArticleStore;

/// Storage operations used by the orchestrator and the manual-entry service.
pub trait ArticleStore {
    /// Look up a stored article by exact URL. Queued drafts are not visible.
    async fn find_by_url(&self, url: &str) -> Result<Option<StoredArticle>, StoreError>;

    /// Queue a draft for the next flush.
    fn insert(&mut self, draft: NewArticle);

    /// Persist every queued draft at once and return how many were written.
    ///
    /// Fails without writing anything if a draft's URL is already stored or
    /// appears twice in the queue.
    async fn flush(&mut self) -> Result<usize, StoreError>;
}

/// In-memory collection with URL index and pending queue.
///
/// Also the working set behind [`JsonArticleStore`].
#[derive(Debug, Default)]
pub struct MemoryArticleStore {
    articles: Vec<StoredArticle>,
    by_url: HashMap<String, usize>,
    pending: Vec<NewArticle>,
}

impl MemoryArticleStore {
    /// Build from an existing collection.
    ///
    /// Fails if two articles share a URL or an id; the collection is never
    /// repaired silently.
    pub fn from_articles(articles: Vec<StoredArticle>) -> Result<Self, StoreError> {
        let mut ids = HashSet::new();
        let mut by_url = HashMap::new();
        for (idx, article) in articles.iter().enumerate() {
            if !ids.insert(article.id) {
                return Err(StoreError::DuplicateId(article.id));
            }
            if by_url.insert(article.url.clone(), idx).is_some() {
                return Err(StoreError::DuplicateUrl(article.url.clone()));
            }
        }
        Ok(Self {
            articles,
            by_url,
            pending: Vec::new(),
        })
    }

    pub fn all(&self) -> &[StoredArticle] {
        &self.articles
    }

    pub fn find(&self, id: u64) -> Option<&StoredArticle> {
        self.articles.iter().find(|a| a.id == id)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn lookup(&self, url: &str) -> Option<&StoredArticle> {
        self.by_url.get(url).map(|&idx| &self.articles[idx])
    }

    /// Turn the queue into stored articles without committing them.
    ///
    /// Returns the collection as it would look after the flush.
    fn stage(&self) -> Result<Vec<StoredArticle>, StoreError> {
        let mut seen = HashSet::new();
        for draft in &self.pending {
            if self.by_url.contains_key(&draft.url) || !seen.insert(draft.url.as_str()) {
                return Err(StoreError::DuplicateUrl(draft.url.clone()));
            }
        }

        let mut next_id = self.articles.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let mut staged = self.articles.clone();
        for draft in &self.pending {
            staged.push(StoredArticle::from_draft(next_id, draft.clone()));
            next_id += 1;
        }
        Ok(staged)
    }

    /// Replace the collection with a staged one and clear the queue.
    fn commit(&mut self, staged: Vec<StoredArticle>) -> usize {
        let written = self.pending.len();
        self.pending.clear();
        self.by_url = staged
            .iter()
            .enumerate()
            .map(|(idx, article)| (article.url.clone(), idx))
            .collect();
        self.articles = staged;
        written
    }
}

impl ArticleStore for MemoryArticleStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<StoredArticle>, StoreError> {
        Ok(self.lookup(url).cloned())
    }

    fn insert(&mut self, draft: NewArticle) {
        self.pending.push(draft);
    }

    async fn flush(&mut self) -> Result<usize, StoreError> {
        let staged = self.stage()?;
        Ok(self.commit(staged))
    }
}
