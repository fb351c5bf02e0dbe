pub mod links;
pub mod static_fetch;
pub mod dynamic_fetch;
pub mod hybrid;

#[cfg(test)]
pub(crate) mod test_support;

pub use dynamic_fetch::{DynamicFetcher, PageRenderer, RenderDeadline, RenderTimeouts};
#[cfg(feature = "headless")]
pub use dynamic_fetch::HeadlessRenderer;
pub use hybrid::{CrawlOutcome, HybridCrawler, DEFAULT_DYNAMIC_THRESHOLD};
pub use static_fetch::{FetchOutcome, FetchedPage, StaticFetcher};
