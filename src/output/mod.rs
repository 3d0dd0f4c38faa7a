//! Output module for delivering crawl results
//!
//! This module handles:
//! - The page record produced for every processed URL
//! - Batch collection and incremental streaming of records
//! - JSON writers for the command-line front end
//! - Crawl statistics

mod emitter;
pub mod json;
mod record;
pub mod stats;

pub use emitter::{collect, stream, Envelope, Progress};
pub use record::{PageRecord, NON_HTML_CONTENT, NON_HTML_TITLE};
pub use stats::{format_statistics, print_statistics, CrawlStatistics};

use crate::state::CrawlState;
use serde::Serialize;

/// Everything a finished batch crawl produced
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// Records in emission order
    pub pages: Vec<PageRecord>,

    /// Terminal state of the crawl
    pub state: CrawlState,

    pub stats: CrawlStatistics,
}

