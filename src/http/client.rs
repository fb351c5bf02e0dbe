use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::errors::SiteWardenError;

/// Responses larger than this are truncated before link extraction.
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// A completed 2xx response.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    /// URL after redirects were followed.
    pub final_url: String,
    pub status_code: u16,
    /// Header names are stored lowercased.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|v| v.as_str())
    }

    pub fn is_html(&self) -> bool {
        self.header("content-type")
            .map(|ct| ct.to_lowercase().contains("html"))
            .unwrap_or(true)
    }
}

/// Single request/response cycle. Implementations return `Err` for
/// timeouts, connection failures and non-2xx statuses.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, SiteWardenError>;
}

pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, SiteWardenError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| SiteWardenError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<HttpResponse, SiteWardenError> {
        let mut response = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| SiteWardenError::from_request(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SiteWardenError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let headers = {
            let raw = response.headers();
            let mut map = HashMap::with_capacity(raw.len());
            for (k, v) in raw.iter() {
                if let Ok(value) = v.to_str() {
                    map.insert(k.as_str().to_lowercase(), value.to_string());
                }
            }
            map
        };

        // Read chunk by chunk so an oversized body is never fully buffered
        let mut bytes: Vec<u8> = Vec::new();
        let mut truncated = false;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| SiteWardenError::from_request(url, e))?
        {
            let room = MAX_BODY_BYTES - bytes.len();
            if chunk.len() >= room {
                bytes.extend_from_slice(&chunk[..room]);
                truncated = chunk.len() > room;
                break;
            }
            bytes.extend_from_slice(&chunk);
        }
        let body = String::from_utf8_lossy(&bytes).into_owned();

        debug!(url = %url, final_url = %final_url, status = status.as_u16(), bytes = bytes.len(), truncated, "Fetched");

        Ok(HttpResponse {
            final_url,
            status_code: status.as_u16(),
            headers,
            body,
        })
    }
}
