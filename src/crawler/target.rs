//! What a crawl is aimed at: seed, domain, timeout and page budget

use crate::url::{extract_domain, parse_seed, DomainScope};
use crate::UrlError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Hard ceiling on pages (and queued URLs) for any single crawl
pub const SAFETY_CEILING: usize = 100_000;

/// How many pages a crawl may emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageBudget {
    /// At most this many pages (always at least 1)
    Bounded(usize),
    /// Until the frontier runs dry, capped by [`SAFETY_CEILING`]
    Unbounded,
}

impl PageBudget {
    /// A bounded budget, clamped to `1..=SAFETY_CEILING`
    pub fn bounded(pages: usize) -> Self {
        Self::Bounded(pages.clamp(1, SAFETY_CEILING))
    }

    /// The number of pages the engine will actually stop at
    pub fn limit(&self) -> usize {
        match self {
            Self::Bounded(pages) => (*pages).clamp(1, SAFETY_CEILING),
            Self::Unbounded => SAFETY_CEILING,
        }
    }

    pub fn is_bounded(&self) -> bool {
        matches!(self, Self::Bounded(_))
    }

    /// Share of the budget used so far; `None` for unbounded crawls
    pub fn percentage(&self, count: usize) -> Option<f64> {
        match self {
            Self::Bounded(_) => {
                let pct = count as f64 / self.limit() as f64 * 100.0;
                Some((pct * 10.0).round() / 10.0)
            }
            Self::Unbounded => None,
        }
    }
}

/// Bounded budgets serialize as a number, unbounded ones as `"unbounded"`
impl Serialize for PageBudget {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Bounded(pages) => serializer.serialize_u64(*pages as u64),
            Self::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

impl fmt::Display for PageBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(pages) => write!(f, "{}", pages),
            Self::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Immutable description of one crawl
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    base_url: Url,
    domain: String,
    scheme: String,
    timeout: Duration,
    page_budget: PageBudget,
}

impl CrawlTarget {
    /// Builds a target from a seed URL
    ///
    /// # Arguments
    ///
    /// * `seed` - Absolute `http`/`https` URL to start from
    /// * `timeout` - Timeout applied to every page request
    /// * `page_budget` - How many pages the crawl may emit
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlTarget)` - Seed parsed and normalized
    /// * `Err(UrlError)` - Seed is malformed, not HTTP(S), or has no host
    pub fn from_seed(
        seed: &str,
        timeout: Duration,
        page_budget: PageBudget,
    ) -> Result<Self, UrlError> {
        let base_url = parse_seed(seed)?;
        let domain = extract_domain(&base_url).ok_or(UrlError::MissingDomain)?;
        let scheme = base_url.scheme().to_string();

        Ok(Self {
            base_url,
            domain,
            scheme,
            timeout,
            page_budget,
        })
    }

    /// The normalized seed URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn page_budget(&self) -> PageBudget {
        self.page_budget
    }

    /// Scope filter for links discovered during this crawl
    pub fn scope(&self) -> DomainScope {
        DomainScope::new(&self.domain)
    }
}
