//! Runtime configuration.
//!
//! Settings come from an optional YAML file; any field left out falls back to
//! its default, and command-line flags override the result.
//!
//! ```yaml
//! article_limit: 10
//! mode: full            # or `headlines`
//! store_path: articles.json
//! sources: [elmundo, elpais]
//! http:
//!   timeout_secs: 30
//!   user_agent: "press_scraper/0.1.0"
//! ```

use crate::error::ConfigError;
use crate::models::SourceIdentifier;
use crate::scrapers::{ExtractionMode, profile_for};
use itertools::Itertools;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

const DEFAULT_ARTICLE_LIMIT: usize = 10;
const DEFAULT_STORE_PATH: &str = "articles.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Maximum front-page candidates per source per run.
    pub article_limit: usize,
    pub mode: ExtractionMode,
    pub store_path: PathBuf,
    /// Sources to scrape, in registration order.
    pub sources: Vec<SourceIdentifier>,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Per-request timeout; `0` disables it.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            article_limit: DEFAULT_ARTICLE_LIMIT,
            mode: ExtractionMode::Full,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            sources: vec![SourceIdentifier::ElMundo, SourceIdentifier::ElPais],
            http: HttpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("press_scraper/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl AppConfig {
    /// Load from `path`, or use defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: AppConfig = serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.article_limit == 0 {
            return Err(ConfigError::InvalidLimit);
        }
        if let Some(id) = self.sources.iter().find(|&&id| profile_for(id).is_none()) {
            return Err(ConfigError::UnsupportedSource(id.to_string()));
        }
        if let Some(id) = self.sources.iter().duplicates().next() {
            return Err(ConfigError::DuplicateSource(id.to_string()));
        }
        Ok(())
    }
}
