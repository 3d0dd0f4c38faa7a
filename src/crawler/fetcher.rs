//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - The `Transport` seam the engine talks to
//! - A reqwest-backed transport with the configured user agent
//! - Classification of responses into HTML, non-HTML, and transport errors
//!
//! No retries happen here; a failed request becomes a `TransportError`
//! outcome and the crawl moves on.

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Raw response handed back by a transport
#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,

    /// Response headers, names lower-cased
    pub headers: HashMap<String, String>,

    /// Raw body bytes
    pub body: Vec<u8>,

    /// URL the response actually came from (after redirects)
    pub final_url: String,
}

impl TransportResponse {
    /// Looks up a header by name, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// A request that never produced a response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

/// The network capability the crawl engine depends on
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a GET request with the given per-request timeout
    async fn fetch(&self, url: &str, timeout: Duration)
        -> Result<TransportResponse, TransportFailure>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportFailure> {
        (**self).fetch(url, timeout).await
    }
}

/// Classified result of fetching one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A 2xx HTML response
    Html {
        /// Page body, decoded as UTF-8 (lossy)
        body: String,
        /// Final URL after redirects
        final_url: String,
    },

    /// A 2xx response that is not HTML
    NonHtml {
        /// The Content-Type received
        content_type: String,
    },

    /// Network failure, timeout, or non-2xx status
    TransportError {
        /// Error description
        message: String,
    },
}

impl FetchOutcome {
    pub fn is_html(&self) -> bool {
        matches!(self, Self::Html { .. })
    }
}

/// Builds an HTTP client with proper configuration
///
/// The per-request timeout is applied on each request, so the client only
/// carries a connect timeout.
///
/// # Example
///
/// ```no_run
/// use site_harvest::config::UserAgentConfig;
/// use site_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.trim())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Transport backed by a pooled reqwest client
///
/// Each crawl should own its own instance so crawls never share a pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::from_client(build_http_client(config)?))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportFailure> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(e, timeout))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_reqwest_error(e, timeout))?
            .to_vec();

        Ok(TransportResponse {
            status,
            headers,
            body,
            final_url,
        })
    }
}

fn classify_reqwest_error(error: reqwest::Error, timeout: Duration) -> TransportFailure {
    if error.is_timeout() {
        TransportFailure::Timeout(timeout)
    } else if error.is_connect() {
        TransportFailure::Connect(error.to_string())
    } else {
        TransportFailure::Other(error.to_string())
    }
}

/// Fetches a page and classifies the outcome
///
/// # Classification
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | Network failure / timeout | TransportError |
/// | Non-2xx status | TransportError |
/// | 2xx, Content-Type lacks `text/html` | NonHtml |
/// | 2xx HTML | Html |
pub async fn fetch_page<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    timeout: Duration,
) -> FetchOutcome {
    match transport.fetch(url, timeout).await {
        Ok(response) => classify(response),
        Err(e) => FetchOutcome::TransportError {
            message: e.to_string(),
        },
    }
}

/// Classifies a raw response
pub fn classify(response: TransportResponse) -> FetchOutcome {
    if !(200..300).contains(&response.status) {
        return FetchOutcome::TransportError {
            message: format!("HTTP {} for url: {}", response.status, response.final_url),
        };
    }

    let content_type = response.header("content-type").unwrap_or("").to_string();
    if !content_type.to_ascii_lowercase().contains("text/html") {
        return FetchOutcome::NonHtml { content_type };
    }

    FetchOutcome::Html {
        body: String::from_utf8_lossy(&response.body).into_owned(),
        final_url: response.final_url,
    }
}
