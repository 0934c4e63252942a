//! Search-engine-backed connector
//!
//! Asks SerpAPI for organic results matching the query, then visits each
//! result link to pick up a price hint from the page metadata. This covers
//! arbitrary listing sites at the cost of mileage and location.

use crate::config::SerpApiConfig;
use crate::connectors::{Connector, Listing, SearchQuery};
use crate::crawler::{extract_meta_price, Fetcher};
use crate::robots::PolitenessGate;
use crate::CarFinderError;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

const SOURCE: &str = "serp";

/// Subset of the SerpAPI JSON response that the connector reads
#[derive(Debug, Default, Deserialize)]
pub struct SerpResponse {
    #[serde(default)]
    pub organic_results: Vec<OrganicResult>,
    /// Set by the API instead of results (bad key, exhausted quota, ...)
    pub error: Option<String>,
}

/// One organic search result
#[derive(Debug, Clone, Deserialize)]
pub struct OrganicResult {
    pub link: Option<String>,
    pub title: Option<String>,
}

pub struct SerpApiConnector {
    fetcher: Fetcher,
    gate: Arc<PolitenessGate>,
    api_key: String,
    endpoint: Url,
    engine: String,
    num_results: u32,
}

impl SerpApiConnector {
    pub fn new(
        fetcher: Fetcher,
        gate: Arc<PolitenessGate>,
        api_key: impl Into<String>,
        endpoint: Url,
        engine: impl Into<String>,
        num_results: u32,
    ) -> Self {
        Self {
            fetcher,
            gate,
            api_key: api_key.into(),
            endpoint,
            engine: engine.into(),
            num_results,
        }
    }

    pub fn from_config(
        fetcher: Fetcher,
        gate: Arc<PolitenessGate>,
        api_key: impl Into<String>,
        config: &SerpApiConfig,
    ) -> Result<Self, CarFinderError> {
        let endpoint = Url::parse(&config.endpoint)?;
        Ok(Self::new(
            fetcher,
            gate,
            api_key,
            endpoint,
            config.engine.clone(),
            config.num_results,
        ))
    }

    /// Builds the API request URL (includes the key; never log it)
    pub fn build_api_url(&self, term: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("engine", &self.engine)
            .append_pair("q", term)
            .append_pair("num", &self.num_results.to_string())
            .append_pair("api_key", &self.api_key);
        url
    }

    fn redact(&self, message: String) -> String {
        if self.api_key.is_empty() {
            message
        } else {
            message.replace(&self.api_key, "***")
        }
    }

    async fn query_api(&self, term: &str) -> Result<SerpResponse, CarFinderError> {
        let url = self.build_api_url(term);

        let response: SerpResponse = self
            .fetcher
            .get_json(url.as_str())
            .await
            .map_err(|e| CarFinderError::SearchApi(self.redact(e.to_string())))?;

        if let Some(error) = response.error {
            return Err(CarFinderError::SearchApi(self.redact(error)));
        }

        Ok(response)
    }

    /// Visits one result link; `None` when it is disallowed or fails
    async fn visit(&self, result: OrganicResult) -> Option<Listing> {
        let link = result.link.filter(|l| !l.trim().is_empty())?;

        if !self.gate.allowed(&link).await {
            tracing::info!("[{}] robots.txt disallows {}, skipping", SOURCE, link);
            return None;
        }

        let page = match self.fetcher.get(&link).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("[{}] Couldn't fetch {}: {}", SOURCE, link, e);
                return None;
            }
        };

        tracing::debug!("[{}] fetched {} (HTTP {})", SOURCE, link, page.status_code);

        Some(Listing {
            title: result.title,
            price: extract_meta_price(&page.body),
            mileage: None,
            location: None,
            url: link,
            source: SOURCE.to_string(),
        })
    }
}

#[async_trait]
impl Connector for SerpApiConnector {
    fn name(&self) -> &str {
        SOURCE
    }

    /// Queries the API once, then visits each result link in order
    ///
    /// Price bounds and page count do not apply to this source.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>, CarFinderError> {
        tracing::info!("[{}] querying search engine for \"{}\"", SOURCE, query.term);
        let response = self.query_api(&query.term).await?;

        tracing::debug!(
            "[{}] {} organic results",
            SOURCE,
            response.organic_results.len()
        );

        let mut results = Vec::new();
        for result in response.organic_results {
            if let Some(listing) = self.visit(result).await {
                results.push(listing);
            }
        }

        Ok(results)
    }
}
