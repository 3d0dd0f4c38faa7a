//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: lifecycle of a single crawl (idle, running, and its three terminal outcomes)

mod crawl_state;

pub use crawl_state::CrawlState;
