//! Content extraction: raw HTML in, title + clean text out
//!
//! Extraction runs a ranked ladder of rules and takes the first result that
//! clears its quality threshold:
//!
//! | Rank | Rule | Accepted when |
//! |------|------|---------------|
//! | 1 | readability boilerplate removal | text > 50 chars |
//! | 2 | longest content-selector match | always a candidate |
//! | 3 | paragraph aggregation | best so far < 100 chars |
//! | 4 | whole body text | best so far < 50 chars |
//!
//! The title comes from readability when it produced one, otherwise from
//! `<title>`, then the first `<h1>`.

mod strategies;
mod text;

pub use strategies::{
    aggregate_paragraphs, body_text, fallback_title, readability, select_content, Readable,
    CONTENT_SELECTORS,
};
pub use text::{collapse_whitespace, visible_text};

use crate::output::PageRecord;
use scraper::Html;
use text::char_len;
use thiserror::Error;
use url::Url;

/// Minimum readability output length that is trusted as-is
pub const READABILITY_MIN_CHARS: usize = 50;

/// Selector output below this length triggers paragraph aggregation
pub const PARAGRAPH_TRIGGER_CHARS: usize = 100;

/// Output below this length falls back to the whole body
pub const BODY_TRIGGER_CHARS: usize = 50;

/// Errors raised inside the extraction ladder
///
/// These never leave [`extract`]; they end up inside an error record.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// Which rule of the ladder produced the content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Readability,
    Selector,
    Paragraphs,
    Body,
}

/// Title and text extracted from one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub content: String,
    pub strategy: Strategy,
}

/// A record plus the rule that produced it
///
/// `strategy` is `None` when the ladder failed and `record` carries the error.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub record: PageRecord,
    pub strategy: Option<Strategy>,
}

impl Extraction {
    pub fn is_error(&self) -> bool {
        self.strategy.is_none()
    }
}

/// Runs the extraction ladder
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    use_readability: bool,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            use_readability: true,
        }
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ladder starting at the selector rule
    pub fn without_readability() -> Self {
        Self {
            use_readability: false,
        }
    }

    /// Extracts a record; failures become an error record, never an `Err`
    pub fn extract(&self, html: &str, source_url: &str) -> PageRecord {
        self.extract_page(html, source_url).record
    }

    /// Like [`Extractor::extract`], but also reports the winning rule
    pub fn extract_page(&self, html: &str, source_url: &str) -> Extraction {
        match self.extract_article(html, source_url) {
            Ok(article) => {
                tracing::debug!(
                    "Extracted {} chars from {} via {:?}",
                    char_len(&article.content),
                    source_url,
                    article.strategy
                );
                Extraction {
                    record: PageRecord::new(source_url, article.title, article.content),
                    strategy: Some(article.strategy),
                }
            }
            Err(e) => {
                tracing::warn!("Error extracting content from {}: {}", source_url, e);
                Extraction {
                    record: PageRecord::extraction_error(source_url, &e.to_string()),
                    strategy: None,
                }
            }
        }
    }

    /// Runs the ladder and reports which rule won
    pub fn extract_article(&self, html: &str, source_url: &str) -> Result<Article, ExtractError> {
        let readable = if self.use_readability {
            Url::parse(source_url)
                .ok()
                .and_then(|url| readability(html, &url))
        } else {
            None
        };

        let document = Html::parse_document(html);

        let title = match readable.as_ref().map(|r| r.title.as_str()) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => fallback_title(&document)?,
        };

        if let Some(readable) = readable {
            if char_len(&readable.text) > READABILITY_MIN_CHARS {
                return Ok(Article {
                    title,
                    content: readable.text,
                    strategy: Strategy::Readability,
                });
            }
        }

        let (mut content, mut strategy) = match select_content(&document)? {
            Some(text) => (text, Strategy::Selector),
            None => (String::new(), Strategy::Selector),
        };

        if char_len(&content) < PARAGRAPH_TRIGGER_CHARS {
            let paragraphs = aggregate_paragraphs(&document)?;
            if char_len(&paragraphs) > char_len(&content) {
                content = paragraphs;
                strategy = Strategy::Paragraphs;
            }
        }

        if char_len(&content) < BODY_TRIGGER_CHARS {
            content = body_text(&document)?;
            strategy = Strategy::Body;
        }

        Ok(Article {
            title,
            content: collapse_whitespace(&content),
            strategy,
        })
    }
}

/// Extracts a record with the full ladder
pub fn extract(html: &str, source_url: &str) -> PageRecord {
    Extractor::new().extract(html, source_url)
}
