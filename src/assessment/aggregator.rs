use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{AssessmentSettings, DEFAULT_WORKERS, MAX_WORKERS};
use crate::crawler::{HybridCrawler, StaticFetcher};
use crate::errors::SiteWardenError;
use crate::http::{HttpFetch, ReqwestFetcher};
use crate::models::{
    AssessedPage, AssessmentReport, CrawlTarget, Finding, FindingCategory, RemediationSuggestion,
    SeverityCounts,
};
use crate::remediation::{
    HttpKnowledgeIndex, KnowledgeIndex, RemediationEngine, RemediationStrategy, UninitializedIndex,
};
use crate::scanner::PostureScanner;
use super::score::summary_score;

/// Version string stamped into every report.
pub fn generator_version() -> String {
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("sitewarden {} ({})", env!("CARGO_PKG_VERSION"), hash),
        _ => format!("sitewarden {}", env!("CARGO_PKG_VERSION")),
    }
}

/// Runs crawl, scan and remediation for one origin and assembles the report.
pub struct Assessor {
    crawler: HybridCrawler,
    scanner: PostureScanner,
    engine: RemediationEngine,
    workers: usize,
    cancel_token: CancellationToken,
}

impl Assessor {
    pub fn new(crawler: HybridCrawler, scanner: PostureScanner, engine: RemediationEngine) -> Self {
        Self {
            crawler,
            scanner,
            engine,
            workers: DEFAULT_WORKERS,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Wire up the production components from resolved settings.
    pub fn from_settings(settings: &AssessmentSettings) -> Result<Self, SiteWardenError> {
        let http: Arc<dyn HttpFetch> = Arc::new(
            ReqwestFetcher::new(settings.static_fetch_timeout, &settings.user_agent)?
        );

        let mut crawler = HybridCrawler::new(StaticFetcher::new(http.clone()))
            .with_dynamic_threshold(settings.dynamic_threshold);
        if settings.enable_dynamic {
            crawler = with_browser(crawler, settings);
        } else {
            info!("Dynamic crawling disabled");
        }

        let index: Arc<dyn KnowledgeIndex> = match &settings.knowledge_endpoint {
            Some(endpoint) => Arc::new(HttpKnowledgeIndex::new(
                endpoint,
                settings.knowledge_api_key.as_deref(),
                settings.index_query_timeout,
            )?),
            None => Arc::new(UninitializedIndex),
        };
        let engine = RemediationEngine::new(RemediationStrategy::IndexThenFallback(index))
            .with_top_k(settings.top_k);

        let assessor = Self::new(crawler, PostureScanner::new(http), engine).with_workers(settings.workers);
        info!(
            dynamic_threshold = assessor.crawler.dynamic_threshold(),
            remediation = assessor.engine.strategy().name(),
            workers = assessor.workers,
            "Assessor configured"
        );
        Ok(assessor)
    }

    /// Concurrent page scans and remediation lookups, clamped to 1..=10.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.clamp(1, MAX_WORKERS);
        self
    }

    /// Replace the cancel token. The crawler observes the same token.
    pub fn with_cancel_token(self, token: CancellationToken) -> Self {
        let Self { crawler, scanner, engine, workers, .. } = self;
        Self {
            crawler: crawler.with_cancel_token(token.clone()),
            scanner,
            engine,
            workers,
            cancel_token: token,
        }
    }

    fn check_cancelled(&self) -> Result<(), SiteWardenError> {
        if self.cancel_token.is_cancelled() {
            warn!("Assessment cancelled");
            return Err(SiteWardenError::Cancelled);
        }
        Ok(())
    }

    /// Crawl `origin_url`, scan every discovered page and attach guidance.
    ///
    /// Fatal crawl errors (invalid target, unreachable origin, cancellation)
    /// abort the run. Per-page failures are recorded on the page and do not.
    pub async fn assess(&self, origin_url: &str, max_pages: usize) -> Result<AssessmentReport, SiteWardenError> {
        let started_at = Utc::now();
        let target = CrawlTarget::new(origin_url, max_pages)?;
        let id = Uuid::new_v4();
        info!(assessment_id = %id, origin = %target.origin_url(), max_pages, "Assessment started");

        // Phase 1: crawl
        let crawl = self.crawler.crawl(&target).await?;
        info!(
            pages = crawl.pages.len(),
            mode = ?crawl.summary.mode,
            failed = crawl.summary.failed_fetches.len(),
            "Crawl complete"
        );

        // Phase 2: posture scan, results kept in discovery order
        self.check_cancelled()?;
        let scans: Vec<_> = stream::iter(crawl.pages.iter())
            .map(|page| self.scanner.scan(&page.url))
            .buffered(self.workers)
            .collect()
            .await;

        let mut pages = Vec::with_capacity(scans.len());
        let mut findings: Vec<Finding> = Vec::new();
        for (record, scan) in crawl.pages.iter().zip(scans) {
            findings.extend(scan.findings);
            pages.push(AssessedPage {
                record: record.clone(),
                status: scan.status,
                status_code: scan.status_code,
                error: scan.error,
            });
        }
        info!(findings = findings.len(), "Posture scan complete");

        // Phase 3: one suggestion per distinct category
        self.check_cancelled()?;
        let remediations = self.remediate(&findings).await;

        let summary_score = summary_score(&findings);
        let severity_counts = SeverityCounts::from_findings(&findings);
        info!(
            assessment_id = %id,
            score = summary_score,
            high = severity_counts.high,
            medium = severity_counts.medium,
            low = severity_counts.low,
            "Assessment complete"
        );

        Ok(AssessmentReport {
            id,
            target,
            started_at,
            finished_at: Utc::now(),
            crawl: crawl.summary,
            pages,
            findings,
            remediations,
            severity_counts,
            summary_score,
            generator: generator_version(),
        })
    }

    async fn remediate(&self, findings: &[Finding]) -> Vec<RemediationSuggestion> {
        let categories: BTreeSet<FindingCategory> = findings.iter().map(|f| f.category).collect();
        stream::iter(categories)
            .map(|category| self.engine.remediate(category, category.description()))
            .buffered(self.workers)
            .collect()
            .await
    }
}

#[cfg(feature = "headless")]
fn with_browser(crawler: HybridCrawler, settings: &AssessmentSettings) -> HybridCrawler {
    use crate::crawler::{DynamicFetcher, HeadlessRenderer};
    let renderer = Arc::new(HeadlessRenderer::new(settings.render_timeouts.clone()));
    crawler.with_dynamic(DynamicFetcher::new(renderer))
}

#[cfg(not(feature = "headless"))]
fn with_browser(crawler: HybridCrawler, _settings: &AssessmentSettings) -> HybridCrawler {
    warn!("Built without the `headless` feature; dynamic crawling unavailable");
    crawler
}
