//! Robots.txt handling module
//!
//! This module provides the politeness gate: fetching, parsing, and caching
//! robots.txt files, and deciding whether a listing URL may be fetched.

mod cache;
mod gate;
mod parser;

pub use cache::RobotsCache;
pub use gate::PolitenessGate;
pub use parser::ParsedRobots;

use crate::CarFinderError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Resolves the origin and robots.txt location for a URL
///
/// # Returns
///
/// * `Some((origin, robots_url))` - e.g. `("https://www.ebay.com", "https://www.ebay.com/robots.txt")`
/// * `None` - If the URL is not an HTTP(S) URL with a host
pub fn robots_location(url: &Url) -> Option<(String, Url)> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.host_str()?;

    let origin = url.origin().ascii_serialization();
    let robots_url = url.join("/robots.txt").ok()?;
    Some((origin, robots_url))
}

/// Fetches robots.txt from the given location
///
/// A 4xx response means the site publishes no policy, which allows
/// everything. Transport failures, timeouts and other non-success statuses
/// are reported as errors so the caller can apply its failure policy.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `robots_url` - Absolute robots.txt URL
/// * `timeout` - Request timeout for this fetch only
///
/// # Returns
///
/// * `Ok(ParsedRobots)` - Successfully fetched and parsed robots.txt
/// * `Err(CarFinderError::Robots)` - Failed to fetch
pub async fn fetch_robots(
    client: &Client,
    robots_url: &Url,
    timeout: Duration,
) -> Result<ParsedRobots, CarFinderError> {
    let response = client
        .get(robots_url.as_str())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| CarFinderError::Robots(format!("{}: {}", robots_url, e)))?;

    let status = response.status();
    if status.is_client_error() {
        tracing::debug!("No robots.txt at {} (HTTP {})", robots_url, status.as_u16());
        return Ok(ParsedRobots::allow_all());
    }

    if !status.is_success() {
        return Err(CarFinderError::Robots(format!(
            "{}: HTTP {}",
            robots_url,
            status.as_u16()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| CarFinderError::Robots(format!("{}: {}", robots_url, e)))?;

    Ok(ParsedRobots::from_content(&body))
}
