//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run full crawls
//! through the reqwest transport.

use futures::StreamExt;
use site_harvest::config::UserAgentConfig;
use site_harvest::crawler::{
    scrape_single, start_crawl, start_crawl_streaming, CrawlTarget, Crawler, HttpTransport,
    PageBudget,
};
use site_harvest::output::{self, Envelope};
use site_harvest::state::CrawlState;
use site_harvest::CrawlError;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn transport() -> HttpTransport {
    HttpTransport::new(&UserAgentConfig::default()).expect("Failed to build transport")
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        ))
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, title: &str, body: &str, calls: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(title, body))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        "Home",
        r#"<a href="/page1">Page 1</a> <a href="/page2/">Page 2</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/page1", "Page1", r#"<a href="/">Home</a>"#, 1).await;
    mount_page(&server, "/page2", "Page2", "<p>No links here</p>", 1).await;

    let pages = start_crawl(
        &format!("{}/", server.uri()),
        PageBudget::bounded(10),
        TIMEOUT,
        transport(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(pages.len(), 3);
    assert_eq!(pages[0].source_url(), format!("{}/", server.uri()));
    assert_eq!(pages[1].source_url(), format!("{}/page1", server.uri()));
    assert_eq!(pages[2].source_url(), format!("{}/page2", server.uri()));
}

#[tokio::test]
async fn test_page_budget_respected() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        "Home",
        r#"<a href="/page1">Page 1</a> <a href="/page2">Page 2</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/page1", "Page1", r#"<a href="/page3">Page 3</a>"#, 1).await;
    mount_page(&server, "/page2", "Page2", "", 0).await;
    mount_page(&server, "/page3", "Page3", "", 0).await;

    let target = CrawlTarget::from_seed(&server.uri(), TIMEOUT, PageBudget::bounded(2))
        .expect("Invalid seed");
    let report = output::collect(Crawler::new(target, transport())).await;

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.state, CrawlState::BudgetExhausted);
}

#[tokio::test]
async fn test_content_type_handling() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        "Home",
        r#"<a href="/report.pdf">Report</a> <a href="/after">After</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/after", "After", "", 1).await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"%PDF-1.4 <a href=\"/hidden\">x</a>".to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let target = CrawlTarget::from_seed(&server.uri(), TIMEOUT, PageBudget::bounded(10))
        .expect("Invalid seed");
    let report = output::collect(Crawler::new(target, transport())).await;

    assert_eq!(report.pages.len(), 3);
    assert_eq!(report.pages[1].title(), "Non-HTML Content");
    assert_eq!(report.pages[1].content(), "Skipped non-HTML content");
    assert_eq!(report.stats.non_html_pages, 1);
}

#[tokio::test]
async fn test_error_status_does_not_stop_crawl() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        "Home",
        r#"<a href="/broken">Broken</a> <a href="/fine">Fine</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/fine", "Fine", "", 1).await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let pages = start_crawl(&server.uri(), PageBudget::Unbounded, TIMEOUT, transport())
        .await
        .expect("Crawl failed");

    assert_eq!(pages.len(), 3);
    assert_eq!(pages[1].title(), "");
    assert!(pages[1].content().starts_with("Request error: HTTP 500"));
    assert_eq!(pages[2].source_url(), format!("{}/fine", server.uri()));
}

#[tokio::test]
async fn test_timeout_becomes_record() {
    let server = MockServer::start().await;

    mount_page(&server, "/", "Home", r#"<a href="/slow">Slow</a>"#, 1).await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page("Slow", "").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let pages = start_crawl(
        &server.uri(),
        PageBudget::bounded(5),
        Duration::from_secs(1),
        transport(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(pages.len(), 2);
    assert!(
        pages[1].content().contains("timeout"),
        "unexpected content: {}",
        pages[1].content()
    );
}

#[tokio::test]
async fn test_tracking_variants_fetched_once() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        "Home",
        r##"
            <a href="/article?utm_source=newsletter">A</a>
            <a href="/article/">B</a>
            <a href="/article#comments">C</a>
            <a href="https://elsewhere.invalid/article">D</a>
        "##,
        1,
    )
    .await;
    mount_page(&server, "/article", "Article", "", 1).await;

    let pages = start_crawl(&server.uri(), PageBudget::bounded(10), TIMEOUT, transport())
        .await
        .expect("Crawl failed");

    assert_eq!(pages.len(), 2);
}

#[tokio::test]
async fn test_redirect_target_not_refetched() {
    let server = MockServer::start().await;

    let location = format!("{}/home", server.uri());
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", location.as_str()))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/home",
        "Home",
        r#"<a href="/home">Self</a> <a href="about">About</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/about", "About", "", 1).await;

    let pages = start_crawl(&server.uri(), PageBudget::bounded(10), TIMEOUT, transport())
        .await
        .expect("Crawl failed");

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].source_url(), format!("{}/", server.uri()));
}

#[tokio::test]
async fn test_scrape_single() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        "Home",
        r#"<main><p>A single page with enough text to be picked up by the extractor.</p></main>
           <a href="/next">Next</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/next", "Next", "", 0).await;

    let record = scrape_single(&server.uri(), TIMEOUT, transport())
        .await
        .expect("Scrape failed");

    assert!(record.content().contains("single page with enough text"));
    assert!(!record.content().contains('\n'));
}

#[tokio::test]
async fn test_streaming_crawl() {
    let server = MockServer::start().await;

    mount_page(&server, "/", "Home", r#"<a href="/one">One</a>"#, 1).await;
    mount_page(&server, "/one", "One", "", 1).await;

    let envelopes: Vec<Envelope> = start_crawl_streaming(
        &server.uri(),
        PageBudget::Unbounded,
        TIMEOUT,
        Duration::from_millis(10),
        transport(),
    )
    .expect("Invalid seed")
    .collect()
    .await;

    assert!(matches!(envelopes.first(), Some(Envelope::Start { .. })));
    let pages = envelopes
        .iter()
        .filter(|e| matches!(e, Envelope::Page { .. }))
        .count();
    assert_eq!(pages, 2);
    assert_eq!(
        envelopes.last(),
        Some(&Envelope::Complete {
            total: 2,
            state: CrawlState::Completed
        })
    );
}

#[tokio::test]
async fn test_invalid_seed_rejected() {
    let result = start_crawl(
        "mailto:someone@example.com",
        PageBudget::bounded(1),
        TIMEOUT,
        transport(),
    )
    .await;

    assert!(matches!(result, Err(CrawlError::InvalidSeed { .. })));
}
