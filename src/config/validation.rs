use crate::config::types::{Config, PolitenessConfig, SearchConfig, SourcesConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_user_agent_config(&config.user_agent)?;
    validate_politeness_config(&config.politeness)?;
    validate_search_config(&config.search)?;
    validate_sources_config(&config.sources)?;
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    validate_http_url("contact_url", &config.contact_url)?;

    Ok(())
}

/// Validates request pacing and timeouts
fn validate_politeness_config(config: &PolitenessConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.robots_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "robots_timeout_secs must be >= 1, got {}",
            config.robots_timeout_secs
        )));
    }

    Ok(())
}

/// Validates search behavior
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.page_count < 1 || config.page_count > 10 {
        return Err(ConfigError::Validation(format!(
            "page_count must be between 1 and 10, got {}",
            config.page_count
        )));
    }

    if config.max_results < 1 {
        return Err(ConfigError::Validation(format!(
            "max_results must be >= 1, got {}",
            config.max_results
        )));
    }

    if config.fallback_term.trim().is_empty() {
        return Err(ConfigError::Validation(
            "fallback_term cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates per-source endpoints
fn validate_sources_config(config: &SourcesConfig) -> Result<(), ConfigError> {
    validate_http_url("sources.ebay.base_url", &config.ebay.base_url)?;
    validate_http_url("sources.serpapi.endpoint", &config.serpapi.endpoint)?;

    if config.serpapi.engine.is_empty() {
        return Err(ConfigError::Validation(
            "sources.serpapi.engine cannot be empty".to_string(),
        ));
    }

    if config.serpapi.num_results < 1 || config.serpapi.num_results > 100 {
        return Err(ConfigError::Validation(format!(
            "sources.serpapi.num_results must be between 1 and 100, got {}",
            config.serpapi.num_results
        )));
    }

    Ok(())
}

/// Validates that a value is an absolute HTTP(S) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", field, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
