use serde::Deserialize;

/// Main configuration structure for Car Finder
///
/// Every section is optional; a missing file or section falls back to the
/// built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub politeness: PolitenessConfig,
    pub search: SearchConfig,
    pub sources: SourcesConfig,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler, also the product token matched against robots.txt
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the full User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "CarFinderBot".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        }
    }
}

/// What the politeness gate does when a robots.txt cannot be retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotsFailurePolicy {
    /// Proceed as if everything were allowed (logged as a warning)
    #[default]
    Allow,
    /// Treat the origin as fully disallowed
    Deny,
}

/// Request pacing and robots.txt behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolitenessConfig {
    /// Fixed delay slept before every request (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Timeout for page and API requests (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Timeout for robots.txt requests (seconds)
    #[serde(rename = "robots-timeout-secs")]
    pub robots_timeout_secs: u64,

    #[serde(rename = "robots-unavailable")]
    pub robots_unavailable: RobotsFailurePolicy,
}

impl Default for PolitenessConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 1000,
            request_timeout_secs: 12,
            robots_timeout_secs: 5,
            robots_unavailable: RobotsFailurePolicy::Allow,
        }
    }
}

/// Search behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of result pages fetched per paginated connector
    #[serde(rename = "page-count")]
    pub page_count: u32,

    /// Default result cap when the filters do not carry one
    #[serde(rename = "max-results")]
    pub max_results: usize,

    /// Base query term used when no make, model or keywords are given
    #[serde(rename = "fallback-term")]
    pub fallback_term: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_count: 2,
            max_results: 200,
            fallback_term: "used car".to_string(),
        }
    }
}

/// Per-source connector settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub ebay: EbayConfig,
    pub serpapi: SerpApiConfig,
}

/// eBay Motors search settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EbayConfig {
    /// Search results endpoint
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Restrict results to the "used" item condition
    #[serde(rename = "used-only")]
    pub used_only: bool,
}

impl Default for EbayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.ebay.com/sch/i.html".to_string(),
            used_only: true,
        }
    }
}

/// SerpAPI search settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SerpApiConfig {
    /// JSON search endpoint
    pub endpoint: String,

    /// Search engine requested from the API
    pub engine: String,

    /// Number of organic results requested
    #[serde(rename = "num-results")]
    pub num_results: u32,
}

impl Default for SerpApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://serpapi.com/search.json".to_string(),
            engine: "google".to_string(),
            num_results: 20,
        }
    }
}
