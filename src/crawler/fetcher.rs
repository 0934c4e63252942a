//! HTTP fetcher implementation
//!
//! This module handles all page and API requests, including:
//! - Building the shared HTTP client with the identifying user agent
//! - Pacing every request through the configured [`Pacer`]
//! - Classifying transport failures and non-success statuses
//!
//! There is no retry logic: a failed request is returned to the caller.

use crate::config::UserAgentConfig;
use crate::crawler::pacing::Pacer;
use crate::CarFinderError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Page body content
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// One client is built per search and shared by the politeness gate and all
/// connectors, so connections can be reused.
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Overall request timeout
///
/// # Example
///
/// ```no_run
/// use car_finder::config::UserAgentConfig;
/// use car_finder::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(12)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Paced GET requests over a shared client
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    pacer: Arc<dyn Pacer>,
}

impl Fetcher {
    pub fn new(client: Client, pacer: Arc<dyn Pacer>) -> Self {
        Self { client, pacer }
    }

    /// Fetches a page as text
    ///
    /// Sleeps via the pacer, then issues the GET.
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Timeout | `CarFinderError::Timeout` |
    /// | Connection / transport failure | `CarFinderError::Http` |
    /// | Non-2xx status | `CarFinderError::HttpStatus` |
    pub async fn get(&self, url: &str) -> Result<FetchedPage, CarFinderError> {
        let response = self.send(url).await?;
        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();

        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, e))?;

        Ok(FetchedPage {
            final_url,
            status_code,
            body,
        })
    }

    /// Fetches a URL and decodes the body as JSON
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CarFinderError> {
        let response = self.send(url).await?;
        response.json::<T>().await.map_err(|e| classify_error(url, e))
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, CarFinderError> {
        self.pacer.pace().await;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CarFinderError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

/// Maps a reqwest error to the crate's error taxonomy
fn classify_error(url: &str, e: reqwest::Error) -> CarFinderError {
    if e.is_timeout() {
        CarFinderError::Timeout {
            url: url.to_string(),
        }
    } else {
        CarFinderError::Http {
            url: url.to_string(),
            source: e,
        }
    }
}
