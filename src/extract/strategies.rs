//! The individual rules of the extraction ladder
//!
//! Each rule is a plain function over a parsed document; the ladder in
//! `extract/mod.rs` decides which one wins.

use super::text::{char_len, collapse_whitespace, visible_text, within_stripped};
use super::ExtractError;
use scraper::{Html, Selector};
use std::panic::{catch_unwind, AssertUnwindSafe};
use url::Url;

/// Content selectors tried by the selector rule, in order
pub const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    ".post-content",
    ".entry-content",
    ".article-content",
    ".article-body",
    ".post-body",
    ".content",
    "[role=\"main\"]",
    "#content",
    ".main-content",
];

/// Paragraphs at or under this many characters are ignored by aggregation
pub const PARAGRAPH_MIN_CHARS: usize = 20;

/// Output of the readability rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readable {
    pub title: String,
    pub text: String,
}

/// Runs readability-style boilerplate removal
///
/// Returns `None` when the algorithm fails or panics on the input; either way
/// the ladder simply moves on to the next rule.
pub fn readability(html: &str, source_url: &Url) -> Option<Readable> {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        readability::extractor::extract(&mut html.as_bytes(), source_url)
    }));

    match outcome {
        Ok(Ok(product)) => Some(Readable {
            title: collapse_whitespace(&product.title),
            text: readable_text(&product.content),
        }),
        Ok(Err(e)) => {
            tracing::debug!("Readability failed for {}: {:?}", source_url, e);
            None
        }
        Err(_) => {
            tracing::warn!("Readability panicked for {}", source_url);
            None
        }
    }
}

/// Text of the cleaned readability HTML, text nodes joined by spaces
///
/// The crate's own plain-text output runs adjacent blocks together
/// ("Heading" + "Body" becomes "HeadingBody"), so the cleaned markup is
/// walked instead.
fn readable_text(content: &str) -> String {
    let fragment = Html::parse_fragment(content);
    visible_text(fragment.root_element())
}

/// Tries the content selectors and keeps the longest matching text
///
/// Elements nested inside stripped subtrees (`nav`, `footer`, ...) are not
/// candidates. A later match only replaces the best one when strictly longer.
pub fn select_content(document: &Html) -> Result<Option<String>, ExtractError> {
    let mut best: Option<String> = None;
    let mut best_len = 0;

    for selector_str in CONTENT_SELECTORS {
        let selector = parse_selector(selector_str)?;

        for element in document.select(&selector) {
            if within_stripped(element) {
                continue;
            }

            let text = visible_text(element);
            let len = char_len(&text);
            if len > best_len {
                best_len = len;
                best = Some(text);
            }
        }
    }

    Ok(best)
}

/// Concatenates substantial paragraphs in document order
pub fn aggregate_paragraphs(document: &Html) -> Result<String, ExtractError> {
    let selector = parse_selector("p")?;

    let paragraphs: Vec<String> = document
        .select(&selector)
        .filter(|element| !within_stripped(*element))
        .map(visible_text)
        .filter(|text| char_len(text) > PARAGRAPH_MIN_CHARS)
        .collect();

    Ok(paragraphs.join(" "))
}

/// Whole `<body>` text, or the whole document when there is no body
pub fn body_text(document: &Html) -> Result<String, ExtractError> {
    let selector = parse_selector("body")?;

    Ok(match document.select(&selector).next() {
        Some(body) => visible_text(body),
        None => visible_text(document.root_element()),
    })
}

/// Title from `<title>`, else the first `<h1>`, else empty
///
/// A `<title>` element that is present but empty still wins over `<h1>`.
pub fn fallback_title(document: &Html) -> Result<String, ExtractError> {
    for selector_str in ["title", "h1"] {
        let selector = parse_selector(selector_str)?;
        if let Some(element) = document.select(&selector).next() {
            return Ok(collapse_whitespace(&element.text().collect::<String>()));
        }
    }

    Ok(String::new())
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}
