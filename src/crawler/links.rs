use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use crate::models::CrawlTarget;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));
static BASE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("base[href]").expect("static selector"));

const IGNORED_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "data:", "#"];

/// Resolve `href` against `base` and keep it only if it stays on the
/// target's origin. The fragment is stripped so `/page#a` and `/page#b`
/// normalize to the same URL.
pub fn normalize_link(base: &Url, href: &str, target: &CrawlTarget) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let lower = href.to_lowercase();
    if IGNORED_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    if !target.is_same_origin(&url) {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

/// Normalize a batch of raw hrefs, keeping first-seen order and dropping
/// duplicates.
pub fn filter_links<'a, I>(hrefs: I, page_url: &Url, target: &CrawlTarget) -> Vec<Url>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for href in hrefs {
        if let Some(url) = normalize_link(page_url, href, target) {
            if seen.insert(url.to_string()) {
                links.push(url);
            }
        }
    }
    links
}

/// Extract same-origin anchor targets from an HTML document. Malformed
/// markup yields whatever anchors the parser recovers, possibly none.
pub fn extract_links(html: &str, page_url: &Url, target: &CrawlTarget) -> Vec<Url> {
    let document = Html::parse_document(html);

    // <base href> changes what relative links resolve against
    let base = document
        .select(&BASE_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| page_url.join(href).ok())
        .unwrap_or_else(|| page_url.clone());

    let hrefs: Vec<&str> = document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|el| el.value().attr("href"))
        .collect();

    filter_links(hrefs, &base, target)
}
