//! The page record produced for every processed URL

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Title given to records for responses that were not HTML
pub const NON_HTML_TITLE: &str = "Non-HTML Content";

/// Content given to records for responses that were not HTML
pub const NON_HTML_CONTENT: &str = "Skipped non-HTML content";

/// Extracted title and text of one crawled URL
///
/// Every processed URL yields exactly one record, including URLs whose fetch
/// or extraction failed; the failure text then lives in `content`. Records
/// are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    #[serde(serialize_with = "serialize_utc")]
    created_at: DateTime<Utc>,
    id: String,
    source_url: String,
    title: String,
    content: String,
}

impl PageRecord {
    /// Builds a record with a fresh id and the current UTC time
    pub fn new(
        source_url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            created_at: Utc::now(),
            id: Uuid::new_v4().to_string(),
            source_url: source_url.into(),
            title: title.into(),
            content: content.into(),
        }
    }

    /// Record for a response whose content type is not HTML
    pub fn non_html(source_url: impl Into<String>) -> Self {
        Self::new(source_url, NON_HTML_TITLE, NON_HTML_CONTENT)
    }

    /// Record for a request that failed at the transport level
    pub fn transport_error(source_url: impl Into<String>, message: &str) -> Self {
        Self::new(source_url, "", format!("Request error: {}", message))
    }

    /// Record for a page whose content could not be extracted
    pub fn extraction_error(source_url: impl Into<String>, message: &str) -> Self {
        Self::new(source_url, "", format!("Error extracting content: {}", message))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// ISO-8601 with microseconds and a trailing `Z`
fn serialize_utc<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Micros, true))
}
