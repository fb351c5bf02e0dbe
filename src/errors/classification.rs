use super::types::SiteWardenError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// Transient errors are recovered at per-URL or per-lookup granularity
    /// and never abort an assessment.
    pub transient: bool,
}

impl SiteWardenError {
    /// Classify this error to determine its type and whether it is recovered locally.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Recovered locally
            SiteWardenError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                transient: true,
            },
            SiteWardenError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                transient: true,
            },
            SiteWardenError::HttpStatus { .. } => ErrorClassification {
                error_type: "HttpStatusError",
                transient: true,
            },
            SiteWardenError::Browser(_) => ErrorClassification {
                error_type: "BrowserError",
                transient: true,
            },
            SiteWardenError::KnowledgeIndex(_) => ErrorClassification {
                error_type: "KnowledgeIndexError",
                transient: true,
            },

            // Surfaced to the caller
            SiteWardenError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                transient: false,
            },
            SiteWardenError::InvalidTarget(_) => ErrorClassification {
                error_type: "InvalidTargetError",
                transient: false,
            },
            SiteWardenError::OriginUnreachable { .. } => ErrorClassification {
                error_type: "OriginUnreachableError",
                transient: false,
            },
            SiteWardenError::Cancelled => ErrorClassification {
                error_type: "CancelledError",
                transient: false,
            },
            SiteWardenError::Io(_) => ErrorClassification {
                error_type: "IoError",
                transient: false,
            },
            SiteWardenError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                transient: false,
            },
            SiteWardenError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                transient: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_transient() {
        let err = SiteWardenError::Network("connection refused".into());
        let class = err.classify();
        assert!(class.transient);
        assert_eq!(class.error_type, "NetworkError");
    }

    #[test]
    fn test_http_status_transient() {
        let err = SiteWardenError::HttpStatus { url: "https://example.test/".into(), status: 503 };
        assert!(err.classify().transient);
        assert_eq!(err.to_string(), "HTTP 503 from https://example.test/");
    }

    #[test]
    fn test_timeout_transient() {
        let err = SiteWardenError::Timeout("timed out".into());
        assert!(err.classify().transient);
    }

    #[test]
    fn test_knowledge_index_transient() {
        let err = SiteWardenError::KnowledgeIndex("not initialized".into());
        assert!(err.classify().transient);
    }

    #[test]
    fn test_origin_unreachable_fatal() {
        let err = SiteWardenError::OriginUnreachable {
            origin: "https://example.test/".into(),
            reason: "connection refused".into(),
        };
        let class = err.classify();
        assert!(!class.transient);
        assert_eq!(class.error_type, "OriginUnreachableError");
        assert!(err.to_string().contains("https://example.test/"));
    }

    #[test]
    fn test_config_error_fatal() {
        let err = SiteWardenError::Config("invalid config".into());
        assert!(!err.classify().transient);
    }

    #[test]
    fn test_cancelled_fatal() {
        assert!(!SiteWardenError::Cancelled.classify().transient);
    }
}
