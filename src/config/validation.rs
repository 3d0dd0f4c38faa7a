use crate::config::types::{Config, CrawlerConfig, UserAgentConfig};
use crate::ConfigError;

/// Largest accepted per-page timeout (seconds)
pub const MAX_TIMEOUT_SECS: u64 = 60;

/// Largest accepted bounded page budget
pub const MAX_PAGES_LIMIT: usize = 999_999;

/// Largest accepted streaming pause (milliseconds)
pub const MAX_STREAM_DELAY_MS: u64 = 10_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_timeout(config.timeout_secs)?;
    validate_max_pages(config.max_pages)?;

    if config.stream_delay_ms > MAX_STREAM_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "stream_delay_ms must be <= {}ms, got {}ms",
            MAX_STREAM_DELAY_MS, config.stream_delay_ms
        )));
    }

    Ok(())
}

/// Validates a per-page timeout in seconds
pub fn validate_timeout(timeout_secs: u64) -> Result<(), ConfigError> {
    if !(1..=MAX_TIMEOUT_SECS).contains(&timeout_secs) {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECS, timeout_secs
        )));
    }
    Ok(())
}

/// Validates a bounded page budget
pub fn validate_max_pages(max_pages: usize) -> Result<(), ConfigError> {
    if !(1..=MAX_PAGES_LIMIT).contains(&max_pages) {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and {}, got {}",
            MAX_PAGES_LIMIT, max_pages
        )));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    let value = config.user_agent.trim();

    if value.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    // Must be a legal header value
    if value.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user_agent contains control characters: '{}'",
            value.escape_debug()
        )));
    }

    Ok(())
}
