//! In-memory transport used by the engine and emitter tests

use super::fetcher::{Transport, TransportFailure, TransportResponse};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
enum Reply {
    Response(TransportResponse),
    Failure(TransportFailure),
}

/// Serves canned responses keyed by URL; unknown URLs get a 404
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<String>>,
    fetches: AtomicUsize,
    delay: Option<Duration>,
}

fn key(url: &str) -> String {
    Url::parse(url)
        .map(String::from)
        .unwrap_or_else(|_| url.to_string())
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16, content_type: &str, body: &str) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), content_type.to_string());
        self.replies.insert(
            key(url),
            Reply::Response(TransportResponse {
                status,
                headers,
                body: body.as_bytes().to_vec(),
                final_url: key(url),
            }),
        );
        self
    }

    pub fn html(self, url: &str, body: &str) -> Self {
        self.respond(url, 200, "text/html; charset=utf-8", body)
    }

    /// Serves `body` for `url` as if it had been redirected to `final_url`
    pub fn redirect(mut self, url: &str, final_url: &str, body: &str) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/html".to_string());
        self.replies.insert(
            key(url),
            Reply::Response(TransportResponse {
                status: 200,
                headers,
                body: body.as_bytes().to_vec(),
                final_url: key(final_url),
            }),
        );
        self
    }

    pub fn fail(mut self, url: &str, failure: TransportFailure) -> Self {
        self.replies.insert(key(url), Reply::Failure(failure));
        self
    }

    /// Adds a delay to every fetch
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// URLs requested so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn times_fetched(&self, url: &str) -> usize {
        let url = key(url);
        self.calls().iter().filter(|c| **c == url).count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(
        &self,
        url: &str,
        _timeout: Duration,
    ) -> Result<TransportResponse, TransportFailure> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(url.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.replies.get(&key(url)) {
            Some(Reply::Response(response)) => Ok(response.clone()),
            Some(Reply::Failure(failure)) => Err(failure.clone()),
            None => Ok(TransportResponse {
                status: 404,
                headers: HashMap::new(),
                body: Vec::new(),
                final_url: url.to_string(),
            }),
        }
    }
}

/// A paragraph long enough to survive every extraction threshold
pub fn article(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>{title}</title></head><body>\
         <nav>{anchors}</nav>\
         <main><p>{title} has a body paragraph that is comfortably longer than every \
         extraction threshold used by the content ladder.</p></main>\
         </body></html>"
    )
}
