//! Fetch pipeline configuration.

use std::time::Duration;

use url::Url;

use crate::cache::ResultCache;
use crate::retry::RetryPolicy;

/// Settings shared by every provider built from one
/// [`FetchContext`](crate::FetchContext).
#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    /// Timeout applied to each upstream attempt.
    pub timeout: Duration,
    /// How long a normalized result may be served from cache.
    pub cache_ttl: Duration,
    /// Maximum number of cached results; `None` means unbounded.
    pub cache_capacity: Option<usize>,
    pub retry: RetryPolicy,
    /// Replacement for the built-in USGS query endpoint.
    pub usgs_endpoint: Option<Url>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(ResultCache::DEFAULT_TTL_SECS),
            cache_capacity: None,
            retry: RetryPolicy::default(),
            usgs_endpoint: None,
        }
    }
}

impl FetchConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_usgs_endpoint(mut self, endpoint: Url) -> Self {
        self.usgs_endpoint = Some(endpoint);
        self
    }

    /// Builds an empty cache honouring the TTL and capacity settings.
    pub fn build_cache(&self) -> ResultCache {
        let cache = ResultCache::new(self.cache_ttl);
        match self.cache_capacity {
            Some(capacity) => cache.with_capacity(capacity),
            None => cache,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert!(config.cache_capacity.is_none());
        assert_eq!(config.retry.max_attempts, 3);
        assert!(config.usgs_endpoint.is_none());
    }

    #[test]
    fn builder() {
        let url = Url::parse("http://localhost:8080/fdsnws/event/1/query").unwrap();
        let config = FetchConfig::new()
            .with_timeout(Duration::from_secs(5))
            .with_cache_ttl(Duration::from_secs(10))
            .with_cache_capacity(32)
            .with_usgs_endpoint(url.clone());

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.usgs_endpoint, Some(url));

        let cache = config.build_cache();
        assert_eq!(cache.ttl(), Duration::from_secs(10));
        assert_eq!(cache.capacity(), Some(32));
    }
}
