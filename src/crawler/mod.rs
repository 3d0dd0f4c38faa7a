//! Crawler module for single-site crawling
//!
//! This module contains the core crawling logic, including:
//! - The transport seam and its reqwest implementation
//! - Link discovery and the breadth-first frontier
//! - Crawl targets and page budgets
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod target;

#[cfg(test)]
pub(crate) mod mock;

pub use coordinator::Crawler;
pub use fetcher::{
    build_http_client, classify, fetch_page, FetchOutcome, HttpTransport, Transport,
    TransportFailure, TransportResponse,
};
pub use frontier::Frontier;
pub use parser::{discover_links, DiscoveredLinks};
pub use target::{CrawlTarget, PageBudget, SAFETY_CEILING};

use crate::output::{self, Envelope, PageRecord};
use crate::{CrawlError, Result};
use std::time::Duration;
use tokio_stream::wrappers::ReceiverStream;

/// Builds a crawl target, reporting seed problems as [`CrawlError::InvalidSeed`]
fn target_for(seed: &str, timeout: Duration, budget: PageBudget) -> Result<CrawlTarget> {
    CrawlTarget::from_seed(seed, timeout, budget).map_err(|source| CrawlError::InvalidSeed {
        url: seed.to_string(),
        source,
    })
}

/// Runs a complete crawl and returns every record in emission order
///
/// This is the batch entry point. It will:
/// 1. Validate the seed URL
/// 2. Crawl breadth-first until the frontier is empty or the budget is used
/// 3. Return the records, including records for pages that failed
///
/// # Arguments
///
/// * `seed` - Absolute `http`/`https` URL to start from
/// * `budget` - How many pages may be produced
/// * `timeout` - Timeout for each page request
/// * `transport` - Network capability owned by this crawl
///
/// # Returns
///
/// * `Ok(Vec<PageRecord>)` - Crawl finished
/// * `Err(CrawlError)` - The seed URL was rejected
pub async fn start_crawl<T: Transport>(
    seed: &str,
    budget: PageBudget,
    timeout: Duration,
    transport: T,
) -> Result<Vec<PageRecord>> {
    let target = target_for(seed, timeout, budget)?;
    let report = output::collect(Crawler::new(target, transport)).await;
    Ok(report.pages)
}

/// Starts a crawl that delivers results incrementally
///
/// The crawl runs on a spawned task. Dropping the returned stream cancels
/// it: no further pages are fetched once the receiver is gone. `pacing` is
/// waited between pages.
///
/// Must be called from within a Tokio runtime.
pub fn start_crawl_streaming<T>(
    seed: &str,
    budget: PageBudget,
    timeout: Duration,
    pacing: Duration,
    transport: T,
) -> Result<ReceiverStream<Envelope>>
where
    T: Transport + 'static,
{
    let target = target_for(seed, timeout, budget)?;
    Ok(output::stream(Crawler::new(target, transport), pacing))
}

/// Fetches and extracts a single page without following links
pub async fn scrape_single<T: Transport>(
    seed: &str,
    timeout: Duration,
    transport: T,
) -> Result<PageRecord> {
    let target = target_for(seed, timeout, PageBudget::bounded(1))?;
    let mut crawler = Crawler::new(target, transport);

    crawler.next_page().await.ok_or_else(|| CrawlError::Aborted {
        count: 0,
        message: "No page was produced".to_string(),
    })
}
