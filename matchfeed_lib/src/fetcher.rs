//! Rate-limited page fetcher on top of the raw HTTP client.

use std::time::Duration;

use matchfeed_api::{Charset, Client};
use rand::Rng;

use crate::cache::Cache;
use crate::error::CrawlError;

const DEFAULT_MIN_DELAY_SECS: f64 = 3.0;
const DEFAULT_MAX_DELAY_SECS: f64 = 5.0;
/// Upper cap on either bound.
const MAX_DELAY_SECS: f64 = 3600.0;

/// Bounds of the random pause taken before every network request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchConfig {
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs_f64(DEFAULT_MIN_DELAY_SECS),
            max_delay: Duration::from_secs_f64(DEFAULT_MAX_DELAY_SECS),
        }
    }
}

impl FetchConfig {
    /// Reads `MATCHFEED_MIN_DELAY_SECS` and `MATCHFEED_MAX_DELAY_SECS`,
    /// falling back to 3 and 5 seconds.
    pub fn from_env() -> Self {
        Self::from_secs(
            env_f64("MATCHFEED_MIN_DELAY_SECS", DEFAULT_MIN_DELAY_SECS),
            env_f64("MATCHFEED_MAX_DELAY_SECS", DEFAULT_MAX_DELAY_SECS),
        )
    }

    /// Negative or non-finite bounds are treated as zero; bounds above an
    /// hour are capped at an hour.
    pub fn from_secs(min: f64, max: f64) -> Self {
        Self {
            min_delay: secs(min),
            max_delay: secs(max),
        }
    }

    /// No pause at all.
    pub fn no_delay() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Uniform in `[min, max)`, or exactly `min` when the range is empty.
    pub fn next_delay(&self) -> Duration {
        if self.max_delay <= self.min_delay {
            return self.min_delay;
        }
        let secs = rand::thread_rng()
            .gen_range(self.min_delay.as_secs_f64()..self.max_delay.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

fn secs(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value.min(MAX_DELAY_SECS))
    } else {
        Duration::ZERO
    }
}

/// Fetches pages through a cache, pausing a random interval before each
/// request that actually goes to the network. Cache hits never pause.
pub struct RateLimitedFetcher {
    inner: Client,
    config: FetchConfig,
}

impl RateLimitedFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, CrawlError> {
        Ok(Self {
            inner: Client::new()?,
            config,
        })
    }

    pub fn config(&self) -> FetchConfig {
        self.config
    }

    /// Returns the content at `url`, from `cache` when present.
    pub async fn fetch(
        &self,
        url: &str,
        charset: Charset,
        cache: &dyn Cache<String>,
    ) -> Result<String, CrawlError> {
        if let Some(content) = cache.get(url) {
            tracing::debug!("Cache hit for {}", url);
            return Ok(content);
        }

        let delay = self.config.next_delay();
        if !delay.is_zero() {
            tracing::debug!("Waiting {:.1}s before requesting {}", delay.as_secs_f64(), url);
            tokio::time::sleep(delay).await;
        }

        tracing::debug!("Fetching {} ({})", url, charset);
        let content = self.inner.get_text(url, charset).await?;
        cache.put(url.to_string(), content.clone());
        Ok(content)
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<f64>().ok())
        .unwrap_or(default)
}
