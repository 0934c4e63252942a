//! Politeness gate
//!
//! Decides whether the configured agent may fetch a URL, according to the
//! robots.txt published by the URL's origin.

use crate::config::{PolitenessConfig, RobotsFailurePolicy};
use crate::robots::{fetch_robots, robots_location, ParsedRobots, RobotsCache};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

/// Robots.txt gate shared by every connector of one search
///
/// When robots.txt cannot be retrieved, the outcome follows the configured
/// [`RobotsFailurePolicy`]. The default (`Allow`) fails open with a warning,
/// which is a compliance risk the operator accepts by keeping it.
#[derive(Debug)]
pub struct PolitenessGate {
    client: Client,
    agent_token: String,
    robots_timeout: Duration,
    on_unavailable: RobotsFailurePolicy,
    cache: Mutex<RobotsCache>,
}

impl PolitenessGate {
    /// Creates a new gate
    ///
    /// # Arguments
    ///
    /// * `client` - The shared HTTP client
    /// * `agent_token` - Product token matched against `User-agent` groups
    /// * `robots_timeout` - Timeout for each robots.txt fetch
    /// * `on_unavailable` - What to do when robots.txt cannot be fetched
    pub fn new(
        client: Client,
        agent_token: impl Into<String>,
        robots_timeout: Duration,
        on_unavailable: RobotsFailurePolicy,
    ) -> Self {
        Self {
            client,
            agent_token: agent_token.into(),
            robots_timeout,
            on_unavailable,
            cache: Mutex::new(RobotsCache::new()),
        }
    }

    /// Creates a gate from the politeness section of the configuration
    pub fn from_config(
        client: Client,
        agent_token: impl Into<String>,
        config: &PolitenessConfig,
    ) -> Self {
        Self::new(
            client,
            agent_token,
            Duration::from_secs(config.robots_timeout_secs),
            config.robots_unavailable,
        )
    }

    /// Returns whether the agent may fetch `url`
    ///
    /// URLs that do not parse or have no host are never allowed.
    pub async fn allowed(&self, url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!("Cannot check robots.txt for invalid URL {}: {}", url, e);
                return false;
            }
        };

        let Some((origin, robots_url)) = robots_location(&parsed) else {
            tracing::warn!("Cannot resolve robots.txt location for {}", url);
            return false;
        };

        let mut cache = self.cache.lock().await;

        if let Some(entry) = cache.get(&origin) {
            tracing::debug!("robots.txt cache hit for {}", origin);
            return entry.is_allowed(url, &self.agent_token);
        }

        let entry = match fetch_robots(&self.client, &robots_url, self.robots_timeout).await {
            Ok(robots) => {
                tracing::debug!(
                    "Fetched robots.txt for {} ({} bytes)",
                    origin,
                    robots.content().len()
                );
                robots
            }
            Err(e) => match self.on_unavailable {
                RobotsFailurePolicy::Allow => {
                    tracing::warn!(
                        "Could not fetch robots.txt for {} ({}), proceeding carefully",
                        origin,
                        e
                    );
                    ParsedRobots::allow_all()
                }
                RobotsFailurePolicy::Deny => {
                    tracing::warn!(
                        "Could not fetch robots.txt for {} ({}), treating origin as disallowed",
                        origin,
                        e
                    );
                    ParsedRobots::deny_all()
                }
            },
        };

        let allowed = entry.is_allowed(url, &self.agent_token);
        cache.insert(origin, entry);
        allowed
    }

    /// Number of origins whose robots.txt has been resolved
    pub async fn cached_origins(&self) -> usize {
        self.cache.lock().await.len()
    }
}
