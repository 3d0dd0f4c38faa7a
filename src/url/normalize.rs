use crate::UrlError;
use url::Url;

/// Tracking query parameters removed by the enhanced normalization
///
/// Any parameter starting with `utm_` is removed as well.
const TRACKING_PARAMS: &[&str] = &[
    "fbclid", "gclid", "ref", "source", "_ga", "_gl", "mc_cid", "mc_eid", "campaign", "medium",
    "content", "term", "msclkid", "wbraid", "gbraid",
];

/// Lightweight normalization used for link discovery
///
/// Resolves `raw` against `base`, drops the fragment and strips a trailing
/// slash from the path (the root path `/` is kept). Query parameters are left
/// untouched, so the result is still the URL that will actually be requested.
///
/// # Examples
///
/// ```
/// use site_harvest::url::normalize_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let url = normalize_link("intro/?lang=en#setup", &base).unwrap();
/// assert_eq!(url, "https://example.com/docs/intro?lang=en");
/// ```
pub fn normalize_link(raw: &str, base: &Url) -> Result<String, UrlError> {
    Ok(lightweight(resolve(raw, base)?).into())
}

/// Enhanced normalization used as the visited-set key
///
/// Applies everything [`normalize_link`] does, then removes tracking query
/// parameters (keeping the order and encoding of the rest) and drops an empty
/// query. Scheme and host are always lower-cased by the parser.
///
/// # Normalization Steps
///
/// 1. Resolve against `base`; reject if malformed
/// 2. Lowercase scheme and host
/// 3. Remove fragment
/// 4. Remove trailing slash (except for root /)
/// 5. Remove tracking query parameters
/// 6. Remove empty query string (trailing ?)
///
/// # Examples
///
/// ```
/// use site_harvest::url::normalize_url;
/// use url::Url;
///
/// let base = Url::parse("https://ex.com/").unwrap();
/// let a = normalize_url("https://ex.com/a/?utm_source=x#frag", &base).unwrap();
/// let b = normalize_url("https://EX.com/a", &base).unwrap();
/// assert_eq!(a, "https://ex.com/a");
/// assert_eq!(a, b);
/// ```
pub fn normalize_url(raw: &str, base: &Url) -> Result<String, UrlError> {
    Ok(canonical_key(&resolve(raw, base)?))
}

/// Parses an absolute seed URL and applies the lightweight normalization
///
/// Seeds must use `http` or `https` and carry a host.
pub fn parse_seed(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(lightweight(url)),
        _ => Err(UrlError::MissingDomain),
    }
}

/// Applies the lightweight rules to an already parsed URL
pub fn lightweight(mut url: Url) -> Url {
    url.set_fragment(None);
    trim_trailing_slash(&mut url);
    url
}

/// Computes the enhanced (visited-set) form of a parsed URL
///
/// Always derived from the lightweight form, so anything the lightweight
/// normalization treats as equal is equal here too.
pub fn canonical_key(url: &Url) -> String {
    let mut url = lightweight(url.clone());
    strip_tracking_params(&mut url);
    url.into()
}

/// Checks if a query parameter name is a tracking parameter
pub fn is_tracking_param(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key.as_str())
}

fn resolve(raw: &str, base: &Url) -> Result<Url, UrlError> {
    base.join(raw.trim())
        .map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))
}

fn trim_trailing_slash(url: &mut Url) {
    let path = url.path();
    if path == "/" || !path.ends_with('/') {
        return;
    }

    let trimmed = match path.trim_end_matches('/') {
        "" => "/".to_string(),
        rest => rest.to_string(),
    };
    url.set_path(&trimmed);
}

/// Removes tracking parameters while keeping the raw text of the others
fn strip_tracking_params(url: &mut Url) {
    let Some(query) = url.query() else {
        return;
    };

    let kept = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or_default();
            !is_tracking_param(key)
        })
        .collect::<Vec<_>>()
        .join("&");

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&kept));
    }
}
