use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::crawler::{RenderTimeouts, DEFAULT_DYNAMIC_THRESHOLD};
use crate::remediation::DEFAULT_TOP_K;
use super::credentials::resolve_credential;

pub const DEFAULT_MAX_PAGES: usize = 20;
pub const DEFAULT_WORKERS: usize = 5;
pub const MAX_WORKERS: usize = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("sitewarden/", env!("CARGO_PKG_VERSION"));

/// Time allowed beyond navigation and settle for browser launch and teardown.
const RENDER_GRACE: Duration = Duration::from_secs(12);

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SiteWardenConfig {
    pub crawl: Option<CrawlConfig>,
    pub timeouts: Option<TimeoutConfig>,
    pub scan: Option<ScanConfig>,
    pub knowledge: Option<KnowledgeConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CrawlConfig {
    pub max_pages: Option<usize>,
    /// Static link count below which the origin is rendered in a browser.
    pub dynamic_threshold: Option<usize>,
    pub enable_dynamic: Option<bool>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct TimeoutConfig {
    pub static_fetch_secs: Option<u64>,
    pub dynamic_render_secs: Option<u64>,
    pub settle_secs: Option<u64>,
    pub index_query_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ScanConfig {
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct KnowledgeConfig {
    pub endpoint: Option<String>,
    /// Literal key, or `$VAR` to read it from the environment.
    pub api_key: Option<String>,
    pub top_k: Option<usize>,
}

/// Concrete values for one assessment run, defaults filled in.
#[derive(Debug, Clone)]
pub struct AssessmentSettings {
    pub max_pages: usize,
    pub dynamic_threshold: usize,
    pub enable_dynamic: bool,
    pub user_agent: String,
    pub static_fetch_timeout: Duration,
    pub render_timeouts: RenderTimeouts,
    pub index_query_timeout: Duration,
    pub workers: usize,
    pub knowledge_endpoint: Option<String>,
    pub knowledge_api_key: Option<String>,
    pub top_k: usize,
}

impl Default for AssessmentSettings {
    fn default() -> Self {
        Self::from_config(&SiteWardenConfig::default())
    }
}

impl AssessmentSettings {
    pub fn from_config(config: &SiteWardenConfig) -> Self {
        let crawl = config.crawl.clone().unwrap_or_default();
        let timeouts = config.timeouts.clone().unwrap_or_default();
        let scan = config.scan.clone().unwrap_or_default();
        let knowledge = config.knowledge.clone().unwrap_or_default();

        let navigation = Duration::from_secs(timeouts.dynamic_render_secs.unwrap_or(30));
        let settle = Duration::from_secs(timeouts.settle_secs.unwrap_or(3));

        Self {
            max_pages: crawl.max_pages.unwrap_or(DEFAULT_MAX_PAGES),
            dynamic_threshold: crawl.dynamic_threshold.unwrap_or(DEFAULT_DYNAMIC_THRESHOLD),
            enable_dynamic: crawl.enable_dynamic.unwrap_or(true),
            user_agent: crawl.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            static_fetch_timeout: Duration::from_secs(timeouts.static_fetch_secs.unwrap_or(10)),
            render_timeouts: RenderTimeouts {
                navigation,
                settle,
                overall: navigation + settle + RENDER_GRACE,
            },
            index_query_timeout: Duration::from_secs(timeouts.index_query_secs.unwrap_or(10)),
            workers: scan.workers.unwrap_or(DEFAULT_WORKERS).clamp(1, MAX_WORKERS),
            knowledge_endpoint: knowledge.endpoint.filter(|e| !e.trim().is_empty()),
            knowledge_api_key: knowledge.api_key.as_deref().map(resolve_credential),
            top_k: knowledge.top_k.unwrap_or(DEFAULT_TOP_K),
        }
    }
}
