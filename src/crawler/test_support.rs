//! In-process doubles for the network seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::errors::SiteWardenError;
use crate::http::{HttpFetch, HttpResponse};
use super::dynamic_fetch::PageRenderer;

/// Serves canned responses; any unknown URL fails like a refused connection.
#[derive(Default)]
pub struct StubHttp {
    responses: HashMap<String, HttpResponse>,
    requests: Mutex<Vec<String>>,
    cancel_on: Option<(usize, CancellationToken)>,
}

impl StubHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, html: &str) -> Self {
        self.response(url, HttpResponse {
            final_url: url.to_string(),
            status_code: 200,
            headers: [("content-type".to_string(), "text/html".to_string())].into(),
            body: html.to_string(),
        })
    }

    pub fn response(mut self, url: &str, response: HttpResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    /// Cancel `token` while serving the `nth` request (1-based).
    pub fn cancel_on_request(mut self, nth: usize, token: CancellationToken) -> Self {
        self.cancel_on = Some((nth, token));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl HttpFetch for StubHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse, SiteWardenError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
            if let Some((nth, token)) = &self.cancel_on {
                if requests.len() == *nth {
                    token.cancel();
                }
            }
        }
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| SiteWardenError::Network(format!("{}: connection refused", url)))
    }
}

/// Renders canned link lists; unknown URLs fail like a crashed browser.
#[derive(Default)]
pub struct StubRenderer {
    links: HashMap<String, Vec<String>>,
    calls: AtomicUsize,
}

impl StubRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn links(mut self, url: &str, hrefs: &[&str]) -> Self {
        self.links.insert(url.to_string(), hrefs.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageRenderer for StubRenderer {
    async fn render_links(&self, url: &Url) -> Result<Vec<String>, SiteWardenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.links
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| SiteWardenError::Browser(format!("render of {} crashed", url)))
    }
}

/// Build an HTML page whose anchors point at `paths`.
pub fn html_with_links(paths: &[&str]) -> String {
    let anchors: String = paths
        .iter()
        .map(|p| format!("<a href=\"{}\">{}</a>\n", p, p))
        .collect();
    format!("<html><body>\n{}</body></html>", anchors)
}
