//! Result delivery: batch collection and incremental streaming
//!
//! Streaming runs the crawl on a spawned task and pushes [`Envelope`]s into
//! a bounded channel. The task stops fetching as soon as the receiving side
//! is dropped.

use super::{CrawlReport, PageRecord};
use crate::crawler::{Crawler, PageBudget, Transport};
use crate::state::CrawlState;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Envelopes buffered between the crawl task and the consumer
const STREAM_BUFFER: usize = 16;

/// Budget progress attached to every streamed page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub current_count: usize,
    pub budget: PageBudget,
    /// `None` for unbounded crawls
    pub percentage: Option<f64>,
}

/// One message of an incremental crawl
///
/// Serialized as `{"kind": ..., "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum Envelope {
    /// Always first
    Start { seed_url: String, budget: PageBudget },

    /// One per record, in emission order
    Page {
        record: PageRecord,
        progress: Progress,
    },

    /// Frontier size after a page's links were queued
    Progress {
        current_count: usize,
        queued: usize,
        visited: usize,
    },

    /// Sent once after the last page
    Complete { total: usize, state: CrawlState },

    /// Sent instead of `Complete` when the crawl task fails
    Error { message: String, count: usize },
}

impl Envelope {
    /// True for `Complete` and `Error`
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }
}

/// Runs a crawl to the end and gathers all records
pub async fn collect<T: Transport>(crawler: Crawler<T>) -> CrawlReport {
    let report = crawler.run().await;
    tracing::debug!(
        "Collected {} records ({})",
        report.pages.len(),
        report.state
    );
    report
}

/// Runs a crawl on a background task and streams its envelopes
///
/// `pacing` is waited between pages. Must be called from within a Tokio
/// runtime.
pub fn stream<T>(crawler: Crawler<T>, pacing: Duration) -> ReceiverStream<Envelope>
where
    T: Transport + 'static,
{
    let (tx, rx) = mpsc::channel(STREAM_BUFFER);
    tokio::spawn(supervise(crawler, pacing, tx));
    ReceiverStream::new(rx)
}

/// Runs the driver and reports a crashed crawl as an `Error` envelope
async fn supervise<T>(crawler: Crawler<T>, pacing: Duration, tx: mpsc::Sender<Envelope>)
where
    T: Transport + 'static,
{
    let count = Arc::new(AtomicUsize::new(0));
    let driver = tokio::spawn(drive(crawler, pacing, tx.clone(), count.clone()));

    if let Err(e) = driver.await {
        let count = count.load(Ordering::SeqCst);
        tracing::error!("Crawl task failed after {} pages: {}", count, e);
        let _ = tx
            .send(Envelope::Error {
                message: format!("Crawl task failed: {}", e),
                count,
            })
            .await;
    }
}

async fn drive<T: Transport>(
    mut crawler: Crawler<T>,
    pacing: Duration,
    tx: mpsc::Sender<Envelope>,
    count: Arc<AtomicUsize>,
) {
    let budget = crawler.target().page_budget();
    let start = Envelope::Start {
        seed_url: crawler.target().base_url().to_string(),
        budget,
    };
    if tx.send(start).await.is_err() {
        crawler.abort("stream receiver dropped");
        return;
    }

    loop {
        let next = tokio::select! {
            biased;
            _ = tx.closed() => None,
            record = crawler.next_page() => Some(record),
        };

        let record = match next {
            None => {
                crawler.abort("stream receiver dropped");
                return;
            }
            Some(None) => break,
            Some(Some(record)) => record,
        };

        let current = crawler.emitted();
        count.store(current, Ordering::SeqCst);

        let page = Envelope::Page {
            record,
            progress: Progress {
                current_count: current,
                budget,
                percentage: budget.percentage(current),
            },
        };
        let progress = Envelope::Progress {
            current_count: current,
            queued: crawler.queued(),
            visited: crawler.visited(),
        };

        if tx.send(page).await.is_err() || tx.send(progress).await.is_err() {
            crawler.abort("stream receiver dropped");
            return;
        }

        let more = crawler.queued() > 0 && current < budget.limit();
        if more && !pacing.is_zero() {
            let cancelled = tokio::select! {
                _ = tx.closed() => true,
                _ = tokio::time::sleep(pacing) => false,
            };
            if cancelled {
                crawler.abort("stream receiver dropped");
                return;
            }
        }
    }

    let complete = Envelope::Complete {
        total: crawler.emitted(),
        state: crawler.state(),
    };
    let _ = tx.send(complete).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::mock::{article, MockTransport};
    use crate::crawler::{CrawlTarget, TransportFailure, TransportResponse};
    use async_trait::async_trait;
    use futures::StreamExt;

    fn crawler<T: Transport>(budget: PageBudget, transport: T) -> Crawler<T> {
        let target =
            CrawlTarget::from_seed("https://site.test/", Duration::from_secs(5), budget).unwrap();
        Crawler::new(target, transport)
    }

    /// Site of `n` pages where each page links to the next
    fn chain(n: usize) -> MockTransport {
        let mut transport = MockTransport::new();
        for i in 0..n {
            let url = if i == 0 {
                "https://site.test/".to_string()
            } else {
                format!("https://site.test/p{}", i)
            };
            let next = format!("/p{}", i + 1);
            let links: Vec<&str> = if i + 1 < n { vec![next.as_str()] } else { vec![] };
            transport = transport.html(&url, &article(&format!("Page {}", i), &links));
        }
        transport
    }

    #[tokio::test]
    async fn test_stream_envelope_order() {
        let envelopes: Vec<_> = stream(crawler(PageBudget::bounded(3), chain(10)), Duration::ZERO)
            .collect()
            .await;

        assert!(matches!(envelopes.first(), Some(Envelope::Start { .. })));

        let pages = envelopes
            .iter()
            .filter(|e| matches!(e, Envelope::Page { .. }))
            .count();
        assert_eq!(pages, 3);

        let finals: Vec<_> = envelopes.iter().filter(|e| e.is_final()).collect();
        assert_eq!(finals.len(), 1);
        assert_eq!(
            envelopes.last(),
            Some(&Envelope::Complete {
                total: 3,
                state: CrawlState::BudgetExhausted
            })
        );

        let last_page = envelopes
            .iter()
            .rposition(|e| matches!(e, Envelope::Page { .. }))
            .unwrap();
        assert!(last_page < envelopes.len() - 1);
    }

    #[tokio::test]
    async fn test_page_progress() {
        let envelopes: Vec<_> = stream(crawler(PageBudget::bounded(4), chain(2)), Duration::ZERO)
            .collect()
            .await;

        let progress: Vec<_> = envelopes
            .iter()
            .filter_map(|e| match e {
                Envelope::Page { progress, .. } => Some(progress.clone()),
                _ => None,
            })
            .collect();

        assert_eq!(progress.len(), 2);
        assert_eq!(progress[0].current_count, 1);
        assert_eq!(progress[0].percentage, Some(25.0));
        assert_eq!(progress[1].percentage, Some(50.0));
        assert_eq!(
            envelopes.last(),
            Some(&Envelope::Complete {
                total: 2,
                state: CrawlState::Completed
            })
        );
    }

    #[tokio::test]
    async fn test_unbounded_progress_has_no_percentage() {
        let envelopes: Vec<_> = stream(crawler(PageBudget::Unbounded, chain(1)), Duration::ZERO)
            .collect()
            .await;

        let page = envelopes
            .iter()
            .find(|e| matches!(e, Envelope::Page { .. }))
            .unwrap();
        let json = serde_json::to_value(page).unwrap();
        assert_eq!(json["kind"], "page");
        assert_eq!(json["payload"]["progress"]["budget"], "unbounded");
        assert!(json["payload"]["progress"]["percentage"].is_null());
    }

    #[tokio::test]
    async fn test_dropping_stream_stops_fetching() {
        let transport = Arc::new(chain(50).with_delay(Duration::from_millis(5)));
        let mut envelopes = stream(
            crawler(PageBudget::Unbounded, transport.clone()),
            Duration::from_millis(20),
        );

        let mut pages = 0;
        while let Some(envelope) = envelopes.next().await {
            if matches!(envelope, Envelope::Page { .. }) {
                pages += 1;
                if pages == 2 {
                    break;
                }
            }
        }
        drop(envelopes);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(transport.fetch_count() <= 4, "{}", transport.fetch_count());
    }

    struct PanickingTransport;

    #[async_trait]
    impl Transport for PanickingTransport {
        async fn fetch(
            &self,
            _url: &str,
            _timeout: Duration,
        ) -> Result<TransportResponse, TransportFailure> {
            panic!("transport exploded");
        }
    }

    #[tokio::test]
    async fn test_crashed_crawl_sends_error() {
        let envelopes: Vec<_> = stream(
            crawler(PageBudget::bounded(5), PanickingTransport),
            Duration::ZERO,
        )
        .collect()
        .await;

        assert_eq!(envelopes.len(), 2);
        assert!(matches!(envelopes[0], Envelope::Start { .. }));
        assert!(matches!(envelopes[1], Envelope::Error { count: 0, .. }));
    }

    #[tokio::test]
    async fn test_collect() {
        let report = collect(crawler(PageBudget::bounded(10), chain(3))).await;
        assert_eq!(report.pages.len(), 3);
        assert_eq!(report.state, CrawlState::Completed);
    }
}
