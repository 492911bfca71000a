//! Read and manual-entry operations over the stored collection.
//!
//! Scraped articles are only ever created by the orchestrator. This module
//! serves the other path: listing, looking up, and adding articles by hand,
//! which are tagged with [`SourceIdentifier::Api`].

use crate::error::ArticleError;
use crate::models::{ArticleInput, ArticleOutput, NewArticle, SourceIdentifier};
use crate::store::{ArticleStore, JsonArticleStore};
use chrono::Utc;
use tracing::{info, instrument};

/// Every stored article in presentation form.
pub fn list(store: &JsonArticleStore) -> Vec<ArticleOutput> {
    store.all().iter().map(ArticleOutput::from).collect()
}

/// One stored article in presentation form.
pub fn get(store: &JsonArticleStore, id: u64) -> Result<ArticleOutput, ArticleError> {
    store
        .find(id)
        .map(ArticleOutput::from)
        .ok_or(ArticleError::NotFound(id))
}

/// Validate and store a manually entered article.
#[instrument(level = "info", skip_all)]
pub async fn create(store: &mut JsonArticleStore, input: ArticleInput) -> Result<ArticleOutput, ArticleError> {
    input.validate()?;

    // validate() guarantees all three fields are present.
    let title = input.title.unwrap_or_default().trim().to_string();
    let url = input.url.unwrap_or_default().trim().to_string();
    let body = input.body.unwrap_or_default();

    if store.find_by_url(&url).await?.is_some() {
        return Err(ArticleError::DuplicateUrl(url));
    }

    store.insert(NewArticle {
        title,
        url: url.clone(),
        body,
        source: SourceIdentifier::Api,
        scraped_at: Utc::now(),
    });
    store.flush().await?;

    let created = store
        .find_by_url(&url)
        .await?
        .ok_or(ArticleError::NotFound(0))?;
    info!(id = created.id, %url, "Created article");
    Ok(ArticleOutput::from(&created))
}
