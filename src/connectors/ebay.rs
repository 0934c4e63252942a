//! eBay Motors connector
//!
//! Walks the public search result pages and parses each result card.
//! Card markup:
//!
//! ```html
//! <li class="s-item">
//!   <a class="s-item__link" href="https://www.ebay.com/itm/...">
//!     <div class="s-item__title">2014 Honda Civic LX</div>
//!   </a>
//!   <span class="s-item__price">$9,450.00</span>
//!   <div class="s-item__subtitle">Used · 45,210 miles · from Dallas, TX</div>
//! </li>
//! ```

use crate::config::EbayConfig;
use crate::connectors::{Connector, Listing, SearchQuery};
use crate::crawler::{element_text, resolve_link, select_attr, select_text, Fetcher};
use crate::robots::PolitenessGate;
use crate::CarFinderError;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use url::Url;

const SOURCE: &str = "ebay";

/// Item condition code for "used"
const USED_CONDITION: &str = "3000";

lazy_static! {
    static ref CARD_SELECTOR: Selector = Selector::parse(".s-item").unwrap();
    static ref TITLE_SELECTOR: Selector = Selector::parse(".s-item__title").unwrap();
    static ref LINK_SELECTOR: Selector = Selector::parse(".s-item__link").unwrap();
    static ref PRICE_SELECTOR: Selector = Selector::parse(".s-item__price").unwrap();
    static ref SUBTITLE_SELECTOR: Selector = Selector::parse(".s-item__subtitle").unwrap();
    static ref MILEAGE_REGEX: Regex = Regex::new(r"(?i)(\d[\d,]*)\s*miles\b").unwrap();
    static ref LOCATION_REGEX: Regex = Regex::new(r"(?i)\bfrom\s+([A-Za-z ,]+)").unwrap();
}

/// Direct marketplace connector for eBay Motors search pages
pub struct EbayConnector {
    fetcher: Fetcher,
    gate: Arc<PolitenessGate>,
    base_url: Url,
    used_only: bool,
}

impl EbayConnector {
    pub fn new(fetcher: Fetcher, gate: Arc<PolitenessGate>, base_url: Url, used_only: bool) -> Self {
        Self {
            fetcher,
            gate,
            base_url,
            used_only,
        }
    }

    pub fn from_config(
        fetcher: Fetcher,
        gate: Arc<PolitenessGate>,
        config: &EbayConfig,
    ) -> Result<Self, CarFinderError> {
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self::new(fetcher, gate, base_url, config.used_only))
    }

    /// Builds the search URL for one result page
    ///
    /// Price bounds that are absent (or zero) are left out entirely, and the
    /// page parameter only appears from page 2 on.
    pub fn build_query_url(
        &self,
        term: &str,
        min_price: Option<u32>,
        max_price: Option<u32>,
        page: u32,
    ) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut params = url.query_pairs_mut();
            params.append_pair("_nkw", term);
            if self.used_only {
                params.append_pair("LH_ItemCondition", USED_CONDITION);
            }
            if let Some(min) = min_price.filter(|p| *p > 0) {
                params.append_pair("_udlo", &min.to_string());
            }
            if let Some(max) = max_price.filter(|p| *p > 0) {
                params.append_pair("_udhi", &max.to_string());
            }
            if page > 1 {
                params.append_pair("_pgn", &page.to_string());
            }
        }
        url
    }
}

#[async_trait]
impl Connector for EbayConnector {
    fn name(&self) -> &str {
        SOURCE
    }

    /// Walks result pages `1..=query.pages`
    ///
    /// A page disallowed by robots.txt ends pagination for this search.
    /// Fetch errors propagate to the caller.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>, CarFinderError> {
        let mut results = Vec::new();

        for page in 1..=query.pages {
            let url = self.build_query_url(&query.term, query.min_price, query.max_price, page);
            tracing::info!("[{}] GET {}", SOURCE, url);

            if !self.gate.allowed(url.as_str()).await {
                tracing::warn!(
                    "[{}] robots.txt disallows {}, skipping remaining pages",
                    SOURCE,
                    url
                );
                break;
            }

            let fetched = self.fetcher.get(url.as_str()).await?;
            let base = Url::parse(&fetched.final_url).unwrap_or(url);
            let listings = parse_results_page(&fetched.body, &base);

            tracing::debug!(
                "[{}] page {} (HTTP {}) yielded {} listings",
                SOURCE,
                page,
                fetched.status_code,
                listings.len()
            );
            results.extend(listings);
        }

        Ok(results)
    }
}

/// Parses every result card on a search page
pub fn parse_results_page(html: &str, base_url: &Url) -> Vec<Listing> {
    let document = Html::parse_document(html);

    document
        .select(&CARD_SELECTOR)
        .filter_map(|card| parse_card(card, base_url))
        .collect()
}

/// Parses one result card
///
/// Cards without a title or without a resolvable link yield nothing.
pub fn parse_card(card: ElementRef<'_>, base_url: &Url) -> Option<Listing> {
    let title = select_text(card, &TITLE_SELECTOR)?;

    let url = select_attr(card, &LINK_SELECTOR, "href")
        .and_then(|href| resolve_link(&href, base_url))?;

    let price = select_text(card, &PRICE_SELECTOR);

    let subtitle = card
        .select(&SUBTITLE_SELECTOR)
        .next()
        .map(|el| element_text(el, " "));

    let (mileage, location) = match subtitle.as_deref() {
        Some(text) => (extract_mileage(text), extract_location(text)),
        None => (None, None),
    };

    Some(Listing {
        title: Some(title),
        price,
        mileage,
        location,
        url,
        source: SOURCE.to_string(),
    })
}

/// First number followed by "miles", grouping separators stripped
///
/// ```
/// use car_finder::connectors::extract_mileage;
///
/// assert_eq!(extract_mileage("Used · 45,210 miles · from Dallas, TX"), Some("45210".to_string()));
/// assert_eq!(extract_mileage("Used · Clean title"), None);
/// ```
pub fn extract_mileage(text: &str) -> Option<String> {
    MILEAGE_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace(',', ""))
}

/// Text following a "from" token, trimmed
pub fn extract_location(text: &str) -> Option<String> {
    LOCATION_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
