use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::info;
use url::Url;

use crate::errors::SiteWardenError;
use crate::models::CrawlTarget;
use super::links::filter_links;

/// Loads a page in a full browsing engine and reports the hrefs present in
/// the rendered DOM.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render_links(&self, url: &Url) -> Result<Vec<String>, SiteWardenError>;
}

#[derive(Debug, Clone)]
pub struct RenderTimeouts {
    pub navigation: Duration,
    /// Fixed wait after navigation for client-side rendering to settle.
    pub settle: Duration,
    /// Upper bound on the whole render, browser launch included.
    pub overall: Duration,
}

impl Default for RenderTimeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(30),
            settle: Duration::from_secs(3),
            overall: Duration::from_secs(45),
        }
    }
}

/// Wall-clock budget for one render. Every blocking browser step is capped
/// to what is left, so the browser is dropped once the budget runs out.
#[derive(Debug, Clone, Copy)]
pub struct RenderDeadline {
    deadline: Instant,
}

impl RenderDeadline {
    pub fn starting_now(budget: Duration) -> Self {
        Self { deadline: Instant::now() + budget }
    }

    /// Time left, or `Timeout` naming the step that could not start.
    pub fn remaining(&self, step: &str) -> Result<Duration, SiteWardenError> {
        let left = self.deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            return Err(SiteWardenError::Timeout(format!("render budget exhausted before {}", step)));
        }
        Ok(left)
    }

    /// `wanted`, shortened to the time left.
    pub fn cap(&self, wanted: Duration, step: &str) -> Result<Duration, SiteWardenError> {
        Ok(wanted.min(self.remaining(step)?))
    }
}

pub struct DynamicFetcher {
    renderer: Arc<dyn PageRenderer>,
}

impl DynamicFetcher {
    pub fn new(renderer: Arc<dyn PageRenderer>) -> Self {
        Self { renderer }
    }

    /// Render `url` and return its same-origin links, deduplicated.
    pub async fn fetch(&self, url: &Url, target: &CrawlTarget) -> Result<Vec<Url>, SiteWardenError> {
        let hrefs = self.renderer.render_links(url).await?;
        let links = filter_links(hrefs.iter().map(|s| s.as_str()), url, target);
        info!(url = %url, raw = hrefs.len(), links = links.len(), "Dynamic fetch complete");
        Ok(links)
    }
}

#[cfg(feature = "headless")]
pub use headless::HeadlessRenderer;

#[cfg(feature = "headless")]
mod headless {
    use super::*;
    use headless_chrome::{Browser, LaunchOptions};
    use tracing::warn;

    const COLLECT_LINKS_JS: &str =
        "JSON.stringify(Array.from(document.querySelectorAll('a[href]')).map(a => a.href))";

    /// Slack on the outer guard so the in-thread deadline normally fires first.
    const BACKSTOP_SLACK: Duration = Duration::from_secs(5);

    /// Chrome/Chromium renderer. Each call launches its own browser, which
    /// is dropped (and the process killed) when the call returns on any path.
    pub struct HeadlessRenderer {
        timeouts: RenderTimeouts,
    }

    impl HeadlessRenderer {
        pub fn new(timeouts: RenderTimeouts) -> Self {
            Self { timeouts }
        }

        fn render_sync(
            url: &str,
            timeouts: &RenderTimeouts,
            deadline: RenderDeadline,
        ) -> Result<Vec<String>, SiteWardenError> {
            let options = LaunchOptions::default_builder()
                .headless(true)
                .idle_browser_timeout(timeouts.overall)
                .build()
                .map_err(|e| SiteWardenError::Browser(format!("Browser launch options error: {}", e)))?;
            let browser = Browser::new(options)
                .map_err(|e| SiteWardenError::Browser(format!("Failed to launch Chrome/Chromium: {}", e)))?;

            let tab = browser
                .new_tab()
                .map_err(|e| SiteWardenError::Browser(format!("Failed to create tab: {}", e)))?;
            tab.set_default_timeout(deadline.cap(timeouts.navigation, "navigation")?);

            tab.navigate_to(url)
                .and_then(|t| t.wait_until_navigated())
                .map_err(|e| SiteWardenError::Browser(format!("Navigation to {} failed: {}", url, e)))?;

            std::thread::sleep(deadline.cap(timeouts.settle, "settle")?);

            tab.set_default_timeout(deadline.remaining("link collection")?);
            let result = tab
                .evaluate(COLLECT_LINKS_JS, false)
                .map_err(|e| SiteWardenError::Browser(format!("Link collection failed: {}", e)))?;

            let hrefs = match result.value.as_ref().and_then(|v| v.as_str()) {
                Some(json) => serde_json::from_str::<Vec<String>>(json)?,
                None => Vec::new(),
            };
            Ok(hrefs)
        }
    }

    #[async_trait]
    impl PageRenderer for HeadlessRenderer {
        async fn render_links(&self, url: &Url) -> Result<Vec<String>, SiteWardenError> {
            info!(url = %url, "Launching headless browser");
            let url_owned = url.to_string();
            let timeouts = self.timeouts.clone();
            let deadline = RenderDeadline::starting_now(self.timeouts.overall);

            // headless_chrome is synchronous
            let task = tokio::task::spawn_blocking(move || Self::render_sync(&url_owned, &timeouts, deadline));

            match tokio::time::timeout(self.timeouts.overall + BACKSTOP_SLACK, task).await {
                Ok(Ok(result)) => result,
                Ok(Err(join_err)) => Err(SiteWardenError::Browser(format!("Render task panicked: {}", join_err))),
                Err(_) => {
                    warn!(url = %url, "Headless render exceeded overall timeout");
                    Err(SiteWardenError::Timeout(format!("dynamic render of {}", url)))
                }
            }
        }
    }
}
