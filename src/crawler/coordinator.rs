//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates:
//! - Pulling URLs from the breadth-first frontier
//! - Fetching and classifying pages
//! - Extracting a record for every processed URL
//! - Discovering in-scope links and feeding them back into the frontier
//! - Enforcing the page budget and the crawl state machine
//!
//! The crawl is exposed as a lazy sequence: every call to
//! [`Crawler::next_page`] runs the loop until exactly one record is ready.

use super::fetcher::{fetch_page, FetchOutcome, Transport};
use super::frontier::Frontier;
use super::parser::discover_links;
use super::target::{CrawlTarget, SAFETY_CEILING};
use crate::extract::Extractor;
use crate::output::{CrawlReport, CrawlStatistics, PageRecord};
use crate::state::CrawlState;
use crate::CrawlError;
use std::time::Instant;
use url::Url;

/// Single-site crawl driven one page at a time
pub struct Crawler<T: Transport> {
    target: CrawlTarget,
    transport: T,
    extractor: Extractor,
    frontier: Frontier,
    state: CrawlState,
    emitted: usize,
    stats: CrawlStatistics,
    started: Option<Instant>,
}

impl<T: Transport> Crawler<T> {
    /// Creates an idle crawler with the seed URL queued
    ///
    /// # Arguments
    ///
    /// * `target` - Seed, domain, timeout and budget of this crawl
    /// * `transport` - Network capability owned by this crawl
    pub fn new(target: CrawlTarget, transport: T) -> Self {
        let frontier = Frontier::new(target.base_url().clone(), SAFETY_CEILING);
        Self {
            target,
            transport,
            extractor: Extractor::new(),
            frontier,
            state: CrawlState::Idle,
            emitted: 0,
            stats: CrawlStatistics::default(),
            started: None,
        }
    }

    /// Replaces the content extractor
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn target(&self) -> &CrawlTarget {
        &self.target
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Number of records produced so far
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// URLs waiting in the frontier
    pub fn queued(&self) -> usize {
        self.frontier.len()
    }

    /// URLs claimed for fetching so far
    pub fn visited(&self) -> usize {
        self.frontier.visited_count()
    }

    pub fn stats(&self) -> &CrawlStatistics {
        &self.stats
    }

    /// Moves the state machine, rejecting illegal transitions
    fn transition(&mut self, next: CrawlState) -> Result<(), CrawlError> {
        if !self.state.can_transition_to(next) {
            return Err(CrawlError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        tracing::debug!("Crawl of {} {} -> {}", self.target.domain(), self.state, next);
        self.state = next;

        match next {
            CrawlState::Running => self.started = Some(Instant::now()),
            s if s.is_terminal() => self.finish(),
            _ => {}
        }
        Ok(())
    }

    fn finish(&mut self) {
        if let Some(started) = self.started {
            self.stats.elapsed = started.elapsed();
        }
        self.stats.pages_emitted = self.emitted;
        tracing::info!(
            "Crawling completed. Scraped {} pages ({}).",
            self.emitted,
            self.state
        );
    }

    /// Stops the crawl early; records already produced stay valid
    ///
    /// Does nothing if the crawl already finished.
    pub fn abort(&mut self, reason: &str) {
        if self.state.is_terminal() {
            return;
        }
        tracing::warn!(
            "Aborting crawl of {} after {} pages: {}",
            self.target.domain(),
            self.emitted,
            reason
        );
        // Idle and Running may both move to Aborted
        let _ = self.transition(CrawlState::Aborted);
    }

    /// Produces the next page record, or `None` once the crawl has finished
    ///
    /// The first call moves the crawl from `Idle` to `Running`. Each call
    /// pulls URLs until one is fetched: URLs already visited are skipped
    /// without producing anything.
    pub async fn next_page(&mut self) -> Option<PageRecord> {
        if self.state == CrawlState::Idle {
            tracing::info!(
                "Starting crawl of {} (budget {})",
                self.target.base_url(),
                self.target.page_budget()
            );
            self.transition(CrawlState::Running).ok()?;
        }

        if self.state != CrawlState::Running {
            return None;
        }

        let limit = self.target.page_budget().limit();

        loop {
            if self.emitted >= limit {
                self.transition(CrawlState::BudgetExhausted).ok()?;
                return None;
            }

            let Some(url) = self.frontier.pop() else {
                self.transition(CrawlState::Completed).ok()?;
                return None;
            };

            if !self.frontier.claim(&url) {
                tracing::debug!("Skipping already visited {}", url);
                self.stats.duplicates_skipped += 1;
                continue;
            }

            let record = self.process(url, limit).await;
            self.emitted += 1;
            self.stats.pages_emitted = self.emitted;
            return Some(record);
        }
    }

    /// Fetches one claimed URL and turns it into a record
    async fn process(&mut self, url: Url, limit: usize) -> PageRecord {
        tracing::info!("Scraping: {}", url);

        let outcome = fetch_page(&self.transport, url.as_str(), self.target.timeout()).await;

        match outcome {
            FetchOutcome::Html { body, final_url } => {
                self.stats.html_pages += 1;

                let extraction = self.extractor.extract_page(&body, url.as_str());
                if extraction.is_error() {
                    self.stats.extraction_errors += 1;
                }

                // The record about to be returned is the last one the budget allows
                if self.emitted + 1 < limit {
                    self.follow_links(&url, &final_url, &body);
                }

                extraction.record
            }
            FetchOutcome::NonHtml { content_type } => {
                tracing::warn!("Skipping non-HTML content at {} ({})", url, content_type);
                self.stats.non_html_pages += 1;
                PageRecord::non_html(url.as_str())
            }
            FetchOutcome::TransportError { message } => {
                tracing::warn!("Request error for {}: {}", url, message);
                self.stats.transport_errors += 1;
                PageRecord::transport_error(url.as_str(), &message)
            }
        }
    }

    /// Queues the in-scope links of an already fetched page
    fn follow_links(&mut self, requested: &Url, final_url: &str, body: &str) {
        let scope = self.target.scope();

        let base = match Url::parse(final_url) {
            Ok(final_url) => {
                if scope.contains(&final_url) {
                    self.frontier.mark_visited(&final_url);
                }
                final_url
            }
            Err(_) => requested.clone(),
        };

        let found = discover_links(body, &base, &scope);
        self.stats.links_out_of_scope += found.out_of_scope;
        self.stats.links_invalid += found.invalid;

        let mut queued = 0;
        for link in found.links {
            if self.frontier.push(link) {
                queued += 1;
            }
        }
        self.stats.links_discovered += queued;

        tracing::debug!(
            "Queued {} new links from {} ({} in frontier)",
            queued,
            requested,
            self.frontier.len()
        );
    }

    /// Drains the crawl into a batch report
    pub async fn run(mut self) -> CrawlReport {
        let mut pages = Vec::new();
        while let Some(record) = self.next_page().await {
            pages.push(record);
        }
        self.into_report(pages)
    }

    /// Packages the records gathered by a consumer with the final state
    pub fn into_report(self, pages: Vec<PageRecord>) -> CrawlReport {
        CrawlReport {
            pages,
            state: self.state,
            stats: self.stats,
        }
    }
}
