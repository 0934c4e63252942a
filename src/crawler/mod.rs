//! Crawler module for page fetching and markup helpers
//!
//! This module contains the request plumbing shared by all connectors:
//! - HTTP client construction and paced fetching
//! - Injectable pacing strategies
//! - HTML helpers for text, links and price metadata

mod fetcher;
mod pacing;
mod parser;

pub use fetcher::{build_http_client, FetchedPage, Fetcher};
pub use pacing::{FixedDelay, NoDelay, Pacer};
pub use parser::{element_text, extract_meta_price, resolve_link, select_attr, select_text};
