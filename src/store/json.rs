//! JSON file-backed article store.
//!
//! The whole collection lives in one file as a JSON array of
//! [`StoredArticle`]s:
//!
//! ```text
//! [
//!   {"id": 1, "title": "...", "url": "https://elpais.com/...", "body": "...",
//!    "source": "elpais", "scraped_at": "2025-05-06T14:30:00Z"}
//! ]
//! ```
//!
//! A missing file is an empty collection. A file with a repeated URL or id
//! is rejected on open. Flushing writes `<file>.tmp` and
//! renames it over the target, so the file on disk is always either the
//! pre-run or the post-run collection.

use super::{ArticleStore, MemoryArticleStore};
use crate::error::StoreError;
use crate::models::{NewArticle, StoredArticle};
use crate::utils::ensure_parent_dir;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};

#[derive(Debug)]
pub struct JsonArticleStore {
    path: PathBuf,
    inner: MemoryArticleStore,
}

impl JsonArticleStore {
    /// Load the collection at `path`, or start empty if the file does not exist.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let articles: Vec<StoredArticle> = match fs::read_to_string(&path).await {
            Ok(text) if text.trim().is_empty() => Vec::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Store file missing; starting with an empty collection");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        info!(count = articles.len(), "Loaded article store");
        Ok(Self {
            path,
            inner: MemoryArticleStore::from_articles(articles)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn all(&self) -> &[StoredArticle] {
        self.inner.all()
    }

    pub fn find(&self, id: u64) -> Option<&StoredArticle> {
        self.inner.find(id)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ArticleStore for JsonArticleStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<StoredArticle>, StoreError> {
        self.inner.find_by_url(url).await
    }

    fn insert(&mut self, draft: NewArticle) {
        self.inner.insert(draft);
    }

    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    async fn flush(&mut self) -> Result<usize, StoreError> {
        if self.inner.pending_len() == 0 {
            debug!("Nothing queued; store file left as is");
            return Ok(0);
        }

        let staged = self.inner.stage()?;
        let json = serde_json::to_string_pretty(&staged)?;

        ensure_parent_dir(&self.path).await?;
        let temp = self.temp_path();
        fs::write(&temp, json).await?;
        fs::rename(&temp, &self.path).await?;

        let written = self.inner.commit(staged);
        info!(written, total = self.inner.all().len(), "Flushed article store");
        Ok(written)
    }
}
