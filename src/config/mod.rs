//! Configuration module for Car Finder
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All settings have defaults, so a configuration file is optional.
//!
//! # Example
//!
//! ```no_run
//! use car_finder::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("car-finder.toml")).unwrap();
//! println!("Pages per search: {}", config.search.page_count);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, EbayConfig, PolitenessConfig, RobotsFailurePolicy, SearchConfig, SerpApiConfig,
    SourcesConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{load_config, load_config_with_hash, parse_config};
pub use validation::validate;
