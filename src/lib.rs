//! Site-Harvest: a single-site article crawler
//!
//! This crate crawls a website breadth-first from a seed URL, stays within the
//! seed's domain, and turns every fetched page into a clean title + body record.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Harvest operations
///
/// Per-page failures never show up here; they become [`PageRecord`]s.
/// Only problems that stop a crawl before (or while) it runs are errors.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid seed URL {url}: {source}")]
    InvalidSeed { url: String, source: UrlError },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },

    #[error("Crawl aborted after {count} pages: {message}")]
    Aborted { count: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Site-Harvest operations
pub type Result<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    scrape_single, start_crawl, start_crawl_streaming, CrawlTarget, Crawler, HttpTransport,
    PageBudget, Transport,
};
pub use output::{CrawlReport, Envelope, PageRecord};
pub use state::CrawlState;
pub use url::{in_scope, normalize_link, normalize_url};
