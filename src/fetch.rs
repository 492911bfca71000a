//! HTTP fetch port.
//!
//! The pipeline only needs "GET this URL and give me the body". [`Fetch`]
//! captures that so extractors can be driven by canned pages in tests, and
//! [`ReqwestFetcher`] is the production implementation.
//!
//! No retries happen here. A non-success status is reported as a transport
//! failure just like a connection error.

use crate::error::{ConfigError, FetchError};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Perform a GET and return the response body.
pub trait Fetch {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`Fetch`] implementation backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Build a fetcher with the given user agent and optional per-request timeout.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Fetch for ReqwestFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(%url, status = status.as_u16(), "Non-success response");
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}
