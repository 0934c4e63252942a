//! Search orchestration
//!
//! This module turns user filters into a query, runs the configured
//! connectors one after another, and merges their output into a
//! [`ResultTable`].
//!
//! A failing connector never fails the search: its error is logged and it
//! contributes nothing.

mod filters;
mod table;

pub use filters::{compose_query, SearchFilters};
pub use table::{parse_price, ResultRow, ResultTable};

use crate::config::{Config, SearchConfig};
use crate::connectors::{Connector, EbayConnector, Listing, SearchQuery, SerpApiConnector};
use crate::crawler::{build_http_client, Fetcher, FixedDelay, Pacer};
use crate::robots::PolitenessGate;
use crate::CarFinderError;
use std::sync::Arc;
use std::time::Duration;

/// Runs connectors in order and merges their listings
pub struct Orchestrator {
    connectors: Vec<Box<dyn Connector>>,
    settings: SearchConfig,
}

impl Orchestrator {
    /// Creates an orchestrator over an explicit connector list
    pub fn new(connectors: Vec<Box<dyn Connector>>, settings: SearchConfig) -> Self {
        Self {
            connectors,
            settings,
        }
    }

    /// Builds the connector set for one search
    ///
    /// One HTTP client is created here and shared by the politeness gate and
    /// every connector. eBay is always included; SerpAPI only when the
    /// filters carry an API key.
    ///
    /// # Errors
    ///
    /// Fails only if the HTTP client cannot be built or a configured
    /// endpoint is not a valid URL.
    pub fn from_config(config: &Config, filters: &SearchFilters) -> Result<Self, CarFinderError> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.politeness.request_timeout_secs),
        )?;

        let pacer: Arc<dyn Pacer> =
            Arc::new(FixedDelay::from_millis(config.politeness.request_delay_ms));
        let fetcher = Fetcher::new(client.clone(), pacer);
        let gate = Arc::new(PolitenessGate::from_config(
            client,
            config.user_agent.crawler_name.clone(),
            &config.politeness,
        ));

        let mut connectors: Vec<Box<dyn Connector>> = vec![Box::new(EbayConnector::from_config(
            fetcher.clone(),
            Arc::clone(&gate),
            &config.sources.ebay,
        )?)];

        if let Some(api_key) = filters.api_key() {
            connectors.push(Box::new(SerpApiConnector::from_config(
                fetcher,
                gate,
                api_key,
                &config.sources.serpapi,
            )?));
        }

        Ok(Self::new(connectors, config.search.clone()))
    }

    /// Names of the connectors, in invocation order
    pub fn connector_names(&self) -> Vec<&str> {
        self.connectors.iter().map(|c| c.name()).collect()
    }

    /// Composes the query from `filters` and runs it
    pub async fn search(&self, filters: &SearchFilters) -> ResultTable {
        let query = SearchQuery {
            term: compose_query(filters, &self.settings.fallback_term),
            min_price: filters.min_price(),
            max_price: filters.max_price(),
            pages: self.settings.page_count,
        };
        let max_results = filters.max_results.unwrap_or(self.settings.max_results);

        tracing::info!("Search query: {}", query.term);
        self.run(&query, max_results).await
    }

    /// Runs every connector sequentially and normalizes the combined output
    ///
    /// Once `max_results` listings have accumulated, no further connectors
    /// are invoked. Listings already returned are never truncated.
    pub async fn run(&self, query: &SearchQuery, max_results: usize) -> ResultTable {
        let mut all_listings: Vec<Listing> = Vec::new();

        for connector in &self.connectors {
            match connector.search(query).await {
                Ok(found) => {
                    tracing::info!("[{}] found {} listings", connector.name(), found.len());
                    all_listings.extend(found);
                }
                Err(e) => {
                    tracing::warn!("Connector {} failed: {}", connector.name(), e);
                    continue;
                }
            }

            if all_listings.len() >= max_results {
                tracing::info!(
                    "Collected {} listings (cap {}), skipping remaining connectors",
                    all_listings.len(),
                    max_results
                );
                break;
            }
        }

        let table = ResultTable::from_listings(all_listings);
        tracing::info!("{} unique listings", table.len());
        table
    }
}

/// Runs one complete search
///
/// This is the entry point used by the CLI: it builds the connector set from
/// `config` and `filters`, runs it, and returns the normalized table (empty
/// when nothing was found).
///
/// # Example
///
/// ```no_run
/// use car_finder::{find_cars, Config, SearchFilters};
///
/// # async fn run() -> Result<(), car_finder::CarFinderError> {
/// let filters = SearchFilters::for_location("Dallas TX");
/// let table = find_cars(&filters, &Config::default()).await?;
/// println!("{} listings", table.len());
/// # Ok(())
/// # }
/// ```
pub async fn find_cars(
    filters: &SearchFilters,
    config: &Config,
) -> Result<ResultTable, CarFinderError> {
    let orchestrator = Orchestrator::from_config(config, filters)?;
    tracing::debug!("Connectors: {:?}", orchestrator.connector_names());
    Ok(orchestrator.search(filters).await)
}
