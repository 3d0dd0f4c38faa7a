//! Link discovery for fetched HTML pages
//!
//! Every `<a href>` on a page is considered. A link survives when:
//! - The href is not empty, a same-page anchor, or a `mailto:`/`tel:`/
//!   `javascript:`/`data:` link
//! - It resolves against the page URL to an `http`/`https` URL
//! - Its host is within the crawl's domain scope
//!
//! Surviving links are returned in lightweight-normalized form, in document
//! order, without duplicates.

use crate::url::{is_candidate_href, lightweight, DomainScope};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Links found on one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredLinks {
    /// In-scope links, normalized, in document order
    pub links: Vec<Url>,

    /// Links skipped because their host is outside the scope
    pub out_of_scope: usize,

    /// Hrefs that could not be turned into an HTTP(S) URL
    pub invalid: usize,
}

/// Discovers crawlable links on a page
///
/// # Arguments
///
/// * `html` - The page body
/// * `base_url` - URL the page was served from (after redirects)
/// * `scope` - Domain scope of the running crawl
///
/// # Example
///
/// ```
/// use site_harvest::crawler::discover_links;
/// use site_harvest::url::DomainScope;
/// use url::Url;
///
/// let html = r#"<a href="/a/">A</a><a href="https://other.com/">B</a>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let found = discover_links(html, &base, &DomainScope::new("example.com"));
/// assert_eq!(found.links[0].as_str(), "https://example.com/a");
/// assert_eq!(found.out_of_scope, 1);
/// ```
pub fn discover_links(html: &str, base_url: &Url, scope: &DomainScope) -> DiscoveredLinks {
    let document = Html::parse_document(html);
    let mut found = DiscoveredLinks::default();

    let Ok(selector) = Selector::parse("a[href]") else {
        return found;
    };

    let mut seen = HashSet::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if !is_candidate_href(href) {
            continue;
        }

        let Some(url) = resolve_link(href, base_url) else {
            tracing::debug!("Skipping unresolvable link {}", href);
            found.invalid += 1;
            continue;
        };

        if !scope.contains(&url) {
            found.out_of_scope += 1;
            continue;
        }

        let url = lightweight(url);
        if seen.insert(url.as_str().to_string()) {
            found.links.push(url);
        }
    }

    found
}

/// Resolves a href to an absolute HTTP(S) URL
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let url = base_url.join(href.trim()).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}
