use std::collections::{HashSet, VecDeque};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::errors::SiteWardenError;
use crate::models::{CrawlSummary, CrawlTarget, FetchFailure, FetchMode, PageRecord};
use super::dynamic_fetch::DynamicFetcher;
use super::static_fetch::{FetchOutcome, StaticFetcher};

/// Sites exposing fewer static links than this are treated as client-rendered.
pub const DEFAULT_DYNAMIC_THRESHOLD: usize = 3;

/// Deduplicated, ordered crawl result.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub pages: Vec<PageRecord>,
    pub summary: CrawlSummary,
}

/// Breadth-first traversal state, owned by a single `crawl` call.
struct TraversalState {
    visited: HashSet<String>,
    queued: HashSet<String>,
    frontier: VecDeque<(Url, Url)>,
    pages: Vec<PageRecord>,
    failures: Vec<FetchFailure>,
}

impl TraversalState {
    fn new() -> Self {
        Self {
            visited: HashSet::new(),
            queued: HashSet::new(),
            frontier: VecDeque::new(),
            pages: Vec::new(),
            failures: Vec::new(),
        }
    }

    fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    fn visit(&mut self, record: PageRecord) {
        self.visited.insert(record.url.clone());
        self.pages.push(record);
    }

    fn enqueue(&mut self, links: Vec<Url>, parent: &Url) {
        for link in links {
            let key = link.to_string();
            if self.visited.contains(&key) || !self.queued.insert(key) {
                continue;
            }
            self.frontier.push_back((link, parent.clone()));
        }
    }

    fn into_outcome(self, mode: FetchMode) -> CrawlOutcome {
        let summary = CrawlSummary {
            mode,
            pages_discovered: self.pages.len(),
            failed_fetches: self.failures,
        };
        CrawlOutcome { pages: self.pages, summary }
    }
}

/// Chooses between static BFS and a single dynamic render per crawl.
pub struct HybridCrawler {
    static_fetcher: StaticFetcher,
    dynamic_fetcher: Option<DynamicFetcher>,
    dynamic_threshold: usize,
    cancel_token: CancellationToken,
}

impl HybridCrawler {
    pub fn new(static_fetcher: StaticFetcher) -> Self {
        Self {
            static_fetcher,
            dynamic_fetcher: None,
            dynamic_threshold: DEFAULT_DYNAMIC_THRESHOLD,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn with_dynamic(mut self, dynamic_fetcher: DynamicFetcher) -> Self {
        self.dynamic_fetcher = Some(dynamic_fetcher);
        self
    }

    pub fn with_dynamic_threshold(mut self, threshold: usize) -> Self {
        self.dynamic_threshold = threshold;
        self
    }

    /// Stop issuing new fetches once this token is cancelled.
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    pub fn dynamic_threshold(&self) -> usize {
        self.dynamic_threshold
    }

    pub async fn crawl(&self, target: &CrawlTarget) -> Result<CrawlOutcome, SiteWardenError> {
        let origin = target.origin_url();
        info!(origin = %origin, max_pages = target.max_pages(), "Starting crawl");
        self.check_cancelled()?;

        let first = self.static_fetcher.fetch(origin, target).await;
        let link_count = first.link_count();

        if link_count < self.dynamic_threshold {
            if let Some(dynamic) = &self.dynamic_fetcher {
                info!(
                    origin = %origin,
                    links = link_count,
                    threshold = self.dynamic_threshold,
                    "Few static links, treating site as client-rendered"
                );
                self.check_cancelled()?;
                match dynamic.fetch(origin, target).await {
                    Ok(links) => return Ok(Self::dynamic_outcome(target, links, &first)),
                    Err(e) => {
                        warn!(origin = %origin, error = %e, "Dynamic render of origin failed");
                        if let FetchOutcome::Failed(failure) = &first {
                            return Err(SiteWardenError::OriginUnreachable {
                                origin: origin.to_string(),
                                reason: format!("static: {}; dynamic: {}", failure.reason, e),
                            });
                        }
                        // Static fetch worked, so carry on with the links it gave us
                        let mut outcome = self.traverse(target, first).await?;
                        outcome.summary.failed_fetches.push(FetchFailure {
                            url: origin.to_string(),
                            reason: format!("dynamic render: {}", e),
                        });
                        return Ok(outcome);
                    }
                }
            }
        }

        if let FetchOutcome::Failed(failure) = &first {
            return Err(SiteWardenError::OriginUnreachable {
                origin: origin.to_string(),
                reason: failure.reason.clone(),
            });
        }

        self.traverse(target, first).await
    }

    /// `{origin} ∪ rendered links`, capped, with no second level.
    fn dynamic_outcome(target: &CrawlTarget, links: Vec<Url>, first: &FetchOutcome) -> CrawlOutcome {
        let origin = target.origin_url();
        let mut state = TraversalState::new();
        if let FetchOutcome::Failed(failure) = first {
            state.failures.push(failure.clone());
        }

        state.visit(PageRecord::origin(origin, FetchMode::Dynamic));
        for link in links {
            if state.pages.len() >= target.max_pages() {
                break;
            }
            if state.is_visited(&link) {
                continue;
            }
            state.visit(PageRecord::discovered(&link, origin, FetchMode::Dynamic));
        }

        let outcome = state.into_outcome(FetchMode::Dynamic);
        info!(origin = %origin, pages = outcome.pages.len(), "Dynamic crawl complete");
        outcome
    }

    /// Static breadth-first traversal seeded with the origin's links.
    async fn traverse(&self, target: &CrawlTarget, first: FetchOutcome) -> Result<CrawlOutcome, SiteWardenError> {
        let origin = target.origin_url();
        let mut state = TraversalState::new();

        state.visit(PageRecord::origin(origin, FetchMode::Static));
        match first {
            FetchOutcome::Fetched(page) => state.enqueue(page.links, origin),
            FetchOutcome::Failed(failure) => state.failures.push(failure),
        }

        while state.pages.len() < target.max_pages() {
            let Some((url, parent)) = state.frontier.pop_front() else {
                break;
            };
            if state.is_visited(&url) {
                continue;
            }
            self.check_cancelled()?;

            let outcome = self.static_fetcher.fetch(&url, target).await;
            state.visit(PageRecord::discovered(&url, &parent, FetchMode::Static));
            match outcome {
                FetchOutcome::Fetched(page) => {
                    debug!(url = %url, links = page.links.len(), "Visited");
                    state.enqueue(page.links, &url);
                }
                FetchOutcome::Failed(failure) => state.failures.push(failure),
            }
        }

        let outcome = state.into_outcome(FetchMode::Static);
        info!(
            origin = %origin,
            pages = outcome.pages.len(),
            failed = outcome.summary.failed_fetches.len(),
            "Static crawl complete"
        );
        Ok(outcome)
    }

    fn check_cancelled(&self) -> Result<(), SiteWardenError> {
        if self.cancel_token.is_cancelled() {
            info!("Crawl cancelled");
            Err(SiteWardenError::Cancelled)
        } else {
            Ok(())
        }
    }
}
