use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::http::HttpFetch;
use crate::models::{Finding, FindingCategory, PageStatus};

/// Headers checked on every page, in emission order.
pub const SECURITY_HEADERS: &[(&str, &str, FindingCategory)] = &[
    ("content-security-policy", "Content-Security-Policy", FindingCategory::MissingCsp),
    ("x-frame-options", "X-Frame-Options", FindingCategory::MissingFrameOptions),
    ("strict-transport-security", "Strict-Transport-Security", FindingCategory::MissingHsts),
    ("x-content-type-options", "X-Content-Type-Options", FindingCategory::MissingContentTypeOptions),
];

/// Result of scanning exactly one URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub url: String,
    pub status: PageStatus,
    pub status_code: Option<u16>,
    pub error: Option<String>,
    pub findings: Vec<Finding>,
}

pub struct PostureScanner {
    http: Arc<dyn HttpFetch>,
}

impl PostureScanner {
    pub fn new(http: Arc<dyn HttpFetch>) -> Self {
        Self { http }
    }

    /// Issue one request for `url` and report its transport and header gaps.
    /// Never follows links. A failed request yields no findings and an
    /// unreachable status.
    pub async fn scan(&self, url: &str) -> ScanOutcome {
        match self.http.get(url).await {
            Ok(response) => {
                let findings = evaluate_posture(url, &response.final_url, &response.headers);
                debug!(url = %url, findings = findings.len(), "Posture scanned");
                ScanOutcome {
                    url: url.to_string(),
                    status: PageStatus::Reachable,
                    status_code: Some(response.status_code),
                    error: None,
                    findings,
                }
            }
            Err(e) => {
                let class = e.classify();
                warn!(url = %url, error_type = class.error_type, error = %e, "Page unreachable during scan");
                ScanOutcome {
                    url: url.to_string(),
                    status: PageStatus::Unreachable,
                    status_code: None,
                    error: Some(e.to_string()),
                    findings: Vec::new(),
                }
            }
        }
    }
}

/// Pure posture evaluation. `headers` must be keyed by lowercased name.
/// Output order is fixed: NO_HTTPS first, then `SECURITY_HEADERS` order.
pub fn evaluate_posture(page_url: &str, final_url: &str, headers: &HashMap<String, String>) -> Vec<Finding> {
    let mut findings = Vec::new();

    let scheme = Url::parse(final_url)
        .map(|u| u.scheme().to_string())
        .unwrap_or_default();
    if scheme != "https" {
        findings.push(Finding::new(
            FindingCategory::NoHttps,
            page_url,
            format!("Final URL {} is not served over HTTPS", final_url),
        ));
    }

    for (key, display, category) in SECURITY_HEADERS {
        match headers.get(*key) {
            Some(value) if !value.trim().is_empty() => {}
            Some(_) => findings.push(Finding::new(
                *category,
                page_url,
                format!("{} header present but empty", display),
            )),
            None => findings.push(Finding::new(
                *category,
                page_url,
                format!("{} header absent", display),
            )),
        }
    }

    findings
}
