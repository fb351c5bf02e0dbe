use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Severity level for a posture finding, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of posture gap. Declaration order is the order the scanner
/// emits findings in and the order remediations are listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingCategory {
    NoHttps,
    MissingCsp,
    MissingFrameOptions,
    MissingHsts,
    MissingContentTypeOptions,
    Other,
}

impl FindingCategory {
    pub fn severity(&self) -> Severity {
        match self {
            FindingCategory::NoHttps | FindingCategory::MissingCsp => Severity::High,
            FindingCategory::MissingFrameOptions | FindingCategory::MissingHsts => Severity::Medium,
            FindingCategory::MissingContentTypeOptions | FindingCategory::Other => Severity::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FindingCategory::NoHttps => "NO_HTTPS",
            FindingCategory::MissingCsp => "MISSING_CSP",
            FindingCategory::MissingFrameOptions => "MISSING_FRAME_OPTIONS",
            FindingCategory::MissingHsts => "MISSING_HSTS",
            FindingCategory::MissingContentTypeOptions => "MISSING_CONTENT_TYPE_OPTIONS",
            FindingCategory::Other => "OTHER",
        }
    }

    /// Human-readable label, used in remediation queries.
    pub fn label(&self) -> &'static str {
        match self {
            FindingCategory::NoHttps => "insecure transport (no HTTPS)",
            FindingCategory::MissingCsp => "missing Content-Security-Policy",
            FindingCategory::MissingFrameOptions => "missing X-Frame-Options",
            FindingCategory::MissingHsts => "missing Strict-Transport-Security",
            FindingCategory::MissingContentTypeOptions => "missing X-Content-Type-Options",
            FindingCategory::Other => "security misconfiguration",
        }
    }

    /// Vulnerability description handed to the remediation engine.
    pub fn description(&self) -> &'static str {
        match self {
            FindingCategory::NoHttps => {
                "Page is served over plain HTTP without TLS; traffic can be read or modified in transit. Enforce HTTPS for every request."
            }
            FindingCategory::MissingCsp => {
                "Content-Security-Policy header is missing, leaving the page without a browser-enforced defence against XSS (cross-site scripting) and injected scripts."
            }
            FindingCategory::MissingFrameOptions => {
                "X-Frame-Options header is missing; the page can be embedded in a hostile frame (clickjacking)."
            }
            FindingCategory::MissingHsts => {
                "Strict-Transport-Security (HSTS) header is missing; browsers may be downgraded to HTTP on later visits."
            }
            FindingCategory::MissingContentTypeOptions => {
                "X-Content-Type-Options header is missing; browsers may MIME-sniff responses (set nosniff)."
            }
            FindingCategory::Other => "Security misconfiguration detected in the page's response posture.",
        }
    }
}

impl std::fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected posture gap on one page. Severity is derived from the
/// category and is written out alongside the stored fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Finding {
    pub category: FindingCategory,
    pub page_url: String,
    /// Free text: the literal header value or a note about its absence.
    pub evidence: String,
}

impl Finding {
    pub fn new(category: FindingCategory, page_url: &str, evidence: impl Into<String>) -> Self {
        Self {
            category,
            page_url: page_url.to_string(),
            evidence: evidence.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.category.severity()
    }
}

impl Serialize for Finding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Finding", 4)?;
        state.serialize_field("category", &self.category)?;
        state.serialize_field("page_url", &self.page_url)?;
        state.serialize_field("evidence", &self.evidence)?;
        state.serialize_field("severity", &self.severity())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        assert_eq!(FindingCategory::NoHttps.severity(), Severity::High);
        assert_eq!(FindingCategory::MissingCsp.severity(), Severity::High);
        assert_eq!(FindingCategory::MissingFrameOptions.severity(), Severity::Medium);
        assert_eq!(FindingCategory::MissingHsts.severity(), Severity::Medium);
        assert_eq!(FindingCategory::MissingContentTypeOptions.severity(), Severity::Low);
        assert_eq!(FindingCategory::Other.severity(), Severity::Low);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High < Severity::Medium);
        assert!(Severity::Medium < Severity::Low);
    }

    #[test]
    fn test_category_order_matches_emission_order() {
        let mut cats = vec![
            FindingCategory::MissingContentTypeOptions,
            FindingCategory::MissingCsp,
            FindingCategory::MissingHsts,
            FindingCategory::NoHttps,
            FindingCategory::MissingFrameOptions,
        ];
        cats.sort();
        assert_eq!(cats[0], FindingCategory::NoHttps);
        assert_eq!(cats[4], FindingCategory::MissingContentTypeOptions);
    }

    #[test]
    fn test_finding_serializes_derived_severity() {
        let finding = Finding::new(FindingCategory::MissingHsts, "https://example.test/", "header absent");
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["category"], "MISSING_HSTS");
        assert_eq!(json["severity"], "MEDIUM");
        assert_eq!(json["page_url"], "https://example.test/");
    }

    #[test]
    fn test_finding_deserializes_ignoring_severity() {
        let json = r#"{"category":"NO_HTTPS","page_url":"http://a.test/","evidence":"x","severity":"LOW"}"#;
        let finding: Finding = serde_json::from_str(json).unwrap();
        assert_eq!(finding.severity(), Severity::High);
    }

    #[test]
    fn test_csp_description_mentions_xss() {
        assert!(FindingCategory::MissingCsp.description().to_lowercase().contains("xss"));
    }
}
