use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::crawl::{CrawlSummary, CrawlTarget, PageRecord};
use super::finding::{Finding, Severity};
use super::remediation::RemediationSuggestion;

/// Whether the posture scan could reach a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageStatus {
    Reachable,
    Unreachable,
}

/// A crawled page together with the outcome of scanning it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessedPage {
    #[serde(flatten)]
    pub record: PageRecord,
    pub status: PageStatus,
    pub status_code: Option<u16>,
    /// Failure reason when the page was unreachable.
    pub error: Option<String>,
}

impl AssessedPage {
    pub fn is_reachable(&self) -> bool {
        self.status == PageStatus::Reachable
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut counts = Self::default();
        for finding in findings {
            match finding.severity() {
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// The terminal artifact of one assessment, handed to report generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub id: Uuid,
    pub target: CrawlTarget,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub crawl: CrawlSummary,
    pub pages: Vec<AssessedPage>,
    pub findings: Vec<Finding>,
    /// One suggestion per distinct finding category.
    pub remediations: Vec<RemediationSuggestion>,
    pub severity_counts: SeverityCounts,
    pub summary_score: u32,
    /// Crate version and build hash of the tool that produced the report.
    pub generator: String,
}

impl AssessmentReport {
    pub fn remediation_for(&self, finding: &Finding) -> Option<&RemediationSuggestion> {
        self.remediations.iter().find(|r| r.category == finding.category)
    }

    pub fn page(&self, url: &str) -> Option<&AssessedPage> {
        self.pages.iter().find(|p| p.record.url == url)
    }

    pub fn unreachable_pages(&self) -> impl Iterator<Item = &AssessedPage> {
        self.pages.iter().filter(|p| !p.is_reachable())
    }

    pub fn findings_for_page<'a>(&'a self, url: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings.iter().filter(move |f| f.page_url == url)
    }
}
