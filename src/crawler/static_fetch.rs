use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::http::HttpFetch;
use crate::models::{CrawlTarget, FetchFailure};
use super::links::extract_links;

/// A page fetched without executing client-side code.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    /// Same-origin outbound links in document order.
    pub links: Vec<Url>,
}

/// Typed per-URL result so callers can count failures instead of losing them.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Fetched(FetchedPage),
    Failed(FetchFailure),
}

impl FetchOutcome {
    pub fn link_count(&self) -> usize {
        match self {
            FetchOutcome::Fetched(page) => page.links.len(),
            FetchOutcome::Failed(_) => 0,
        }
    }
}

pub struct StaticFetcher {
    http: Arc<dyn HttpFetch>,
}

impl StaticFetcher {
    pub fn new(http: Arc<dyn HttpFetch>) -> Self {
        Self { http }
    }

    /// GET `url` and extract same-origin links. Errors never propagate: they
    /// come back as `FetchOutcome::Failed`.
    pub async fn fetch(&self, url: &Url, target: &CrawlTarget) -> FetchOutcome {
        let response = match self.http.get(url.as_str()).await {
            Ok(resp) => resp,
            Err(e) => {
                let class = e.classify();
                warn!(url = %url, error_type = class.error_type, error = %e, "Static fetch failed");
                return FetchOutcome::Failed(FetchFailure {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        // Relative links resolve against where redirects actually landed
        let base = Url::parse(&response.final_url).unwrap_or_else(|_| url.clone());
        let links = if response.is_html() {
            extract_links(&response.body, &base, target)
        } else {
            debug!(url = %url, "Non-HTML response, no links extracted");
            Vec::new()
        };

        debug!(url = %url, links = links.len(), "Static fetch complete");
        FetchOutcome::Fetched(FetchedPage {
            url: url.clone(),
            status_code: response.status_code,
            headers: response.headers,
            links,
        })
    }
}
