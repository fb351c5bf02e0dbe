use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::SiteWardenError;

/// Immutable input to a crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlTarget {
    origin_url: Url,
    max_pages: usize,
}

impl CrawlTarget {
    /// Parse and validate a crawl target. The origin URL is stored
    /// fragment-stripped so it dedups against links pointing back at it.
    pub fn new(origin_url: &str, max_pages: usize) -> Result<Self, SiteWardenError> {
        let mut url = Url::parse(origin_url.trim())
            .map_err(|e| SiteWardenError::InvalidTarget(format!("{}: {}", origin_url, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SiteWardenError::InvalidTarget(format!(
                "{}: unsupported scheme '{}'",
                origin_url,
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(SiteWardenError::InvalidTarget(format!("{}: missing host", origin_url)));
        }
        if max_pages == 0 {
            return Err(SiteWardenError::InvalidTarget("max_pages must be at least 1".into()));
        }

        url.set_fragment(None);
        Ok(Self { origin_url: url, max_pages })
    }

    pub fn origin_url(&self) -> &Url {
        &self.origin_url
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// True when `url` shares scheme, host and port with the origin.
    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.origin_url.origin()
    }
}

/// Which fetcher discovered a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FetchMode {
    Static,
    Dynamic,
}

impl std::fmt::Display for FetchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchMode::Static => write!(f, "static"),
            FetchMode::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// One unique URL visited by a crawl. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    /// Parent page URL, or `None` for the origin.
    pub discovered_via: Option<String>,
    pub fetch_mode: FetchMode,
}

impl PageRecord {
    pub fn origin(url: &Url, fetch_mode: FetchMode) -> Self {
        Self {
            url: url.to_string(),
            discovered_via: None,
            fetch_mode,
        }
    }

    pub fn discovered(url: &Url, parent: &Url, fetch_mode: FetchMode) -> Self {
        Self {
            url: url.to_string(),
            discovered_via: Some(parent.to_string()),
            fetch_mode,
        }
    }
}

/// A per-URL fetch failure swallowed by the crawler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub url: String,
    pub reason: String,
}

/// Inspectable summary of how a crawl went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub mode: FetchMode,
    pub pages_discovered: usize,
    pub failed_fetches: Vec<FetchFailure>,
}
