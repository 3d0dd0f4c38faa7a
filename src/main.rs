//! Site-Harvest main entry point
//!
//! This is the command-line interface for the Site-Harvest article crawler.

use anyhow::{bail, Context};
use clap::Parser;
use futures::StreamExt;
use site_harvest::config::{load_config_with_hash, validate, Config};
use site_harvest::crawler::{scrape_single, start_crawl_streaming, CrawlTarget, Crawler};
use site_harvest::output::{self, json, print_statistics};
use site_harvest::url::parse_seed;
use site_harvest::{HttpTransport, PageBudget};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Site-Harvest: a single-site article crawler
///
/// Site-Harvest crawls a website breadth-first from a seed URL, stays on the
/// seed's domain, and prints a clean title and body for every page as JSON.
#[derive(Parser, Debug)]
#[command(name = "site-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A single-site article crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to scrape
    #[arg(short = 'n', long, conflicts_with_all = ["unlimited", "single"])]
    max_pages: Option<usize>,

    /// Crawl until no new pages are found
    #[arg(long, conflicts_with = "single")]
    unlimited: bool,

    /// Scrape only the seed URL
    #[arg(long)]
    single: bool,

    /// Timeout for each page request in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print results as newline-delimited JSON while crawling
    #[arg(long, conflicts_with = "single")]
    stream: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Write results to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Validate settings and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn budget(&self, config: &Config) -> PageBudget {
        if self.single {
            PageBudget::bounded(1)
        } else if self.unlimited {
            PageBudget::Unbounded
        } else {
            PageBudget::bounded(config.crawler.max_pages)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_settings(&cli)?;

    // Reject bad seeds before anything touches the network
    let seed = parse_seed(&cli.url).with_context(|| format!("Invalid URL: {}", cli.url))?;
    let budget = cli.budget(&config);
    let timeout = Duration::from_secs(config.crawler.timeout_secs);

    if cli.dry_run {
        handle_dry_run(&config, seed.as_str(), budget);
        return Ok(());
    }

    let transport =
        HttpTransport::new(&config.user_agent).context("Failed to build HTTP client")?;
    let mut out = open_output(cli.output.as_ref())?;
    let pretty = config.output.pretty;

    if cli.single {
        handle_single(seed.as_str(), timeout, transport, &mut out, pretty).await?;
    } else if cli.stream {
        let pacing = Duration::from_millis(config.crawler.stream_delay_ms);
        handle_stream(seed.as_str(), budget, timeout, pacing, transport, &mut out).await?;
    } else {
        handle_crawl(seed.as_str(), budget, timeout, transport, &mut out, pretty, cli.quiet)
            .await?;
    }

    out.flush()?;
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only JSON.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_harvest=info,warn"),
            1 => EnvFilter::new("site_harvest=debug,info"),
            2 => EnvFilter::new("site_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the optional config file and applies command-line overrides
fn load_settings(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration: {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(timeout) = cli.timeout {
        config.crawler.timeout_secs = timeout;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if cli.pretty {
        config.output.pretty = true;
    }

    validate(&config).context("Invalid settings")?;
    Ok(config)
}

fn open_output(path: Option<&PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    })
}

/// Handles the --dry-run mode: shows the effective settings
fn handle_dry_run(config: &Config, seed: &str, budget: PageBudget) {
    println!("=== Site-Harvest Dry Run ===\n");

    println!("Target:");
    println!("  Seed URL: {}", seed);
    println!("  Page budget: {}", budget);

    println!("\nCrawler Configuration:");
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    println!("  Stream delay: {}ms", config.crawler.stream_delay_ms);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.user_agent);

    println!("\nOutput:");
    println!("  Pretty: {}", config.output.pretty);

    println!("\n✓ Configuration is valid");
}

/// Handles --single: one page, no link following
async fn handle_single(
    seed: &str,
    timeout: Duration,
    transport: HttpTransport,
    out: &mut dyn Write,
    pretty: bool,
) -> anyhow::Result<()> {
    let record = scrape_single(seed, timeout, transport).await?;
    if record.content().is_empty() {
        bail!("No content could be scraped");
    }
    json::write_single(out, &record, pretty)?;
    Ok(())
}

/// Handles --stream: envelopes are written as they arrive
async fn handle_stream(
    seed: &str,
    budget: PageBudget,
    timeout: Duration,
    pacing: Duration,
    transport: HttpTransport,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let mut envelopes = start_crawl_streaming(seed, budget, timeout, pacing, transport)?;
    while let Some(envelope) = envelopes.next().await {
        json::write_envelope(out, &envelope)?;
    }
    Ok(())
}

/// Handles the default batch crawl
async fn handle_crawl(
    seed: &str,
    budget: PageBudget,
    timeout: Duration,
    transport: HttpTransport,
    out: &mut dyn Write,
    pretty: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let target = CrawlTarget::from_seed(seed, timeout, budget)
        .with_context(|| format!("Invalid URL: {}", seed))?;
    let report = output::collect(Crawler::new(target, transport)).await;

    if report.pages.is_empty() {
        bail!("No content could be scraped");
    }

    json::write_records(out, &report.pages, pretty)?;

    if !quiet {
        print_statistics(&report.stats);
    }
    Ok(())
}
