//! Crawl statistics
//!
//! The engine keeps these counters while it runs; batch front ends print
//! them once the crawl is over.

use serde::Serialize;
use std::fmt::Write;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStatistics {
    /// Records produced, successful or not
    pub pages_emitted: usize,

    /// Pages fetched with an HTML response
    pub html_pages: usize,

    /// Pages skipped because the response was not HTML
    pub non_html_pages: usize,

    /// Network failures, timeouts and non-2xx responses
    pub transport_errors: usize,

    /// HTML pages whose content could not be extracted
    pub extraction_errors: usize,

    /// Frontier entries dropped because they were already visited
    pub duplicates_skipped: usize,

    /// Links newly added to the frontier
    pub links_discovered: usize,

    /// Links dropped because they point to another site
    pub links_out_of_scope: usize,

    /// Hrefs that could not be resolved to an HTTP(S) URL
    pub links_invalid: usize,

    /// Wall time from the first pull to the terminal state
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Pages per second over the whole crawl
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pages_emitted as f64 / secs
        } else {
            0.0
        }
    }

    /// Share of records that carry extracted content
    pub fn success_rate(&self) -> f64 {
        if self.pages_emitted == 0 {
            return 0.0;
        }
        let ok = self.html_pages.saturating_sub(self.extraction_errors);
        ok as f64 / self.pages_emitted as f64 * 100.0
    }
}

/// Renders the statistics as a human-readable block
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl Statistics ===\n");

    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Pages scraped: {}", stats.pages_emitted);
    let _ = writeln!(out, "  HTML pages: {}", stats.html_pages);
    let _ = writeln!(out, "  Links queued: {}", stats.links_discovered);
    let _ = writeln!(out, "  Links outside the site: {}", stats.links_out_of_scope);
    if stats.links_invalid > 0 {
        let _ = writeln!(out, "  Unresolvable links: {}", stats.links_invalid);
    }
    let _ = writeln!(out, "  Duplicates skipped: {}", stats.duplicates_skipped);
    let _ = writeln!(
        out,
        "  Elapsed: {:.2}s ({:.2} pages/sec)",
        stats.elapsed.as_secs_f64(),
        stats.rate()
    );
    let _ = writeln!(out);

    let errors = stats.non_html_pages + stats.transport_errors + stats.extraction_errors;
    if errors > 0 {
        let _ = writeln!(out, "Error Summary:");
        for (label, count) in [
            ("Non-HTML content", stats.non_html_pages),
            ("Request errors", stats.transport_errors),
            ("Extraction errors", stats.extraction_errors),
        ] {
            if count > 0 {
                let _ = writeln!(out, "  {}: {}", label, count);
            }
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} pages with extracted content)",
        stats.success_rate(),
        stats.html_pages.saturating_sub(stats.extraction_errors),
        stats.pages_emitted
    );

    out
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout is reserved for JSON output.
pub fn print_statistics(stats: &CrawlStatistics) {
    eprint!("{}", format_statistics(stats));
}
