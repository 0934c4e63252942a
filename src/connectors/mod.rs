//! Listing source connectors
//!
//! Each connector owns one source's query encoding, fetching and parsing,
//! and maps what it finds into the common [`Listing`] shape. Connectors are
//! selected by the orchestrator from explicit configuration.

mod ebay;
mod serpapi;

pub use ebay::{extract_location, extract_mileage, parse_card, parse_results_page, EbayConnector};
pub use serpapi::{OrganicResult, SerpApiConnector, SerpResponse};

use crate::CarFinderError;
use async_trait::async_trait;

/// One discovered vehicle listing
///
/// `url` is the identity of a listing; every other field is best-effort and
/// absent when the source markup did not carry it.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub title: Option<String>,
    /// Raw, source-formatted price text (e.g. "$12,345")
    pub price: Option<String>,
    /// Digits only (e.g. "45210")
    pub mileage: Option<String>,
    pub location: Option<String>,
    pub url: String,
    /// Identifier of the connector that produced the listing
    pub source: String,
}

/// Search parameters handed to every connector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Composed free-text query, location included
    pub term: String,
    pub min_price: Option<u32>,
    pub max_price: Option<u32>,
    /// Result pages to walk for paginated sources
    pub pages: u32,
}

/// A listing source
#[async_trait]
pub trait Connector: Send + Sync {
    /// Identifier used in logs and in `Listing::source`
    fn name(&self) -> &str;

    /// Runs the query against this source
    ///
    /// An `Err` means the whole connector failed; the orchestrator logs it
    /// and continues with the remaining connectors.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>, CarFinderError>;
}
