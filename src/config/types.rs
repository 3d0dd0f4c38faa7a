use serde::Deserialize;

/// Per-page request timeout used when nothing else is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Page budget for a limited crawl when nothing else is configured
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Pause between pages in streaming mode (milliseconds)
pub const DEFAULT_STREAM_DELAY_MS: u64 = 100;

/// Browser-like user agent; plenty of sites refuse obvious bot strings
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for Site-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Timeout applied to each page request (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Page budget for limited crawls
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Pause between pages when streaming results (milliseconds)
    #[serde(rename = "stream-delay-ms")]
    pub stream_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_pages: DEFAULT_MAX_PAGES,
            stream_delay_ms: DEFAULT_STREAM_DELAY_MS,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Value sent in the `User-Agent` header
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON batch output
    pub pretty: bool,
}
