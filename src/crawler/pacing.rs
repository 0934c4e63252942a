//! Request pacing strategies
//!
//! Every request goes through a [`Pacer`] before it is sent. The default
//! [`FixedDelay`] sleeps the same amount before each request, including the
//! first one of a search.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Controls the spacing between consecutive requests
#[async_trait]
pub trait Pacer: Send + Sync + fmt::Debug {
    /// Waits until the next request may be sent
    async fn pace(&self);
}

/// Unconditional fixed delay before every request
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::from_millis(1000)
    }
}

#[async_trait]
impl Pacer for FixedDelay {
    async fn pace(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// No delay at all; for tests against local mock servers
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Pacer for NoDelay {
    async fn pace(&self) {}
}
