use url::Url;

/// Extracts the domain from a URL
///
/// Returns the lower-cased host, or `None` when the URL has no host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_harvest::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Decides whether a URL stays within the crawl's target site
///
/// A URL is in scope when its host is the target domain, the target domain
/// with a `www.` prefix, or the target domain with its `www.` prefix removed.
/// Malformed URLs are never in scope.
///
/// # Examples
///
/// ```
/// use site_harvest::url::in_scope;
///
/// assert!(in_scope("https://www.site.com/x", "site.com"));
/// assert!(in_scope("https://site.com/x", "site.com"));
/// assert!(!in_scope("https://other.com/x", "site.com"));
/// ```
pub fn in_scope(url: &str, target_domain: &str) -> bool {
    Url::parse(url)
        .map(|url| DomainScope::new(target_domain).contains(&url))
        .unwrap_or(false)
}

/// Returns false for hrefs that can never lead to a crawlable page
///
/// Empty hrefs, same-page anchors and `mailto:`/`tel:`/`javascript:`/`data:`
/// links are dropped before any resolution happens.
pub fn is_candidate_href(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return false;
    }

    let lower = href.to_ascii_lowercase();
    !["mailto:", "tel:", "javascript:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

/// The set of hosts a crawl is allowed to visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScope {
    domain: String,
}

impl DomainScope {
    /// Creates a scope for the given target domain
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_ascii_lowercase(),
        }
    }

    /// The target domain as given at crawl start (lower-cased)
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Checks whether the URL's host is covered by this scope
    pub fn contains(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();

        host == self.domain
            || host.strip_prefix("www.") == Some(self.domain.as_str())
            || self.domain.strip_prefix("www.") == Some(host.as_str())
    }
}
