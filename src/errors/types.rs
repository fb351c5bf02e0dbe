use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteWardenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// The crawl could not reach the origin by any fetch mode.
    #[error("Origin unreachable: {origin} ({reason})")]
    OriginUnreachable { origin: String, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Knowledge index error: {0}")]
    KnowledgeIndex(String),

    #[error("Assessment cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SiteWardenError {
    /// Map a reqwest failure onto the transient network variants.
    pub fn from_request(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SiteWardenError::Timeout(format!("{}: {}", url, err))
        } else if let Some(status) = err.status() {
            SiteWardenError::HttpStatus { url: url.to_string(), status: status.as_u16() }
        } else {
            SiteWardenError::Network(format!("{}: {}", url, err))
        }
    }
}
