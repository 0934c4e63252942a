//! Car Finder: a polite used-vehicle listing finder
//!
//! This crate discovers used-car listings across public web sources through a
//! small set of pluggable connectors, respecting robots.txt and a fixed request
//! pace, and merges the results into a single deduplicated table.

pub mod config;
pub mod connectors;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod search;

use thiserror::Error;

/// Main error type for Car Finder operations
#[derive(Debug, Error)]
pub enum CarFinderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Robots.txt error: {0}")]
    Robots(String),

    #[error("Search API error: {0}")]
    SearchApi(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Car Finder operations
pub type Result<T> = std::result::Result<T, CarFinderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use connectors::{Connector, Listing, SearchQuery};
pub use search::{compose_query, find_cars, Orchestrator, ResultRow, ResultTable, SearchFilters};
