//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/seismic/config.toml` by default. Every key is optional:
//!
//! ```toml
//! [query]
//! provider = "usgs"
//! lookback_days = 30
//! min_magnitude = 4.0
//! limit = 80
//! max_limit = 500
//! order_by = "time"
//! max_range_days = 365
//!
//! [fetch]
//! timeout_secs = 30
//! cache_ttl_secs = 60
//! max_attempts = 3
//! retry_after_cap_secs = 10
//! backoff_cap_secs = 4
//! # cache_capacity = 256
//! # usgs_endpoint = "http://localhost:8080/fdsnws/event/1/query"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use seismic_core::OrderBy;
use seismic_providers::{FetchConfig, ResultCache, RetryPolicy};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::service::QueryDefaults;

/// Configuration for the seismic client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Defaults for omitted query parameters.
    pub query: QuerySettings,

    /// Upstream fetch settings.
    pub fetch: FetchSettings,
}

/// Defaults applied to omitted query parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    pub provider: String,
    /// Default start date is this many days before today (UTC).
    pub lookback_days: u32,
    pub min_magnitude: f64,
    pub limit: i64,
    /// Requested limits are clamped to `1..=max_limit`.
    pub max_limit: u32,
    pub order_by: String,
    /// Longest accepted date range, in days.
    pub max_range_days: u32,
}

impl Default for QuerySettings {
    fn default() -> Self {
        let defaults = QueryDefaults::default();
        Self {
            provider: defaults.provider,
            lookback_days: defaults.lookback_days,
            min_magnitude: defaults.min_magnitude,
            limit: defaults.limit,
            max_limit: defaults.max_limit,
            order_by: defaults.order_by.as_str().to_string(),
            max_range_days: defaults.max_range_days,
        }
    }
}

/// Upstream fetch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub max_attempts: u32,
    pub retry_after_cap_secs: u64,
    pub backoff_cap_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_capacity: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usgs_endpoint: Option<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: FetchConfig::DEFAULT_TIMEOUT_SECS,
            cache_ttl_secs: ResultCache::DEFAULT_TTL_SECS,
            max_attempts: RetryPolicy::DEFAULT_MAX_ATTEMPTS,
            retry_after_cap_secs: RetryPolicy::DEFAULT_RETRY_AFTER_CAP_SECS,
            backoff_cap_secs: RetryPolicy::DEFAULT_BACKOFF_CAP_SECS,
            cache_capacity: None,
            usgs_endpoint: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if it does
    /// not exist.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("seismic")
    }

    /// Checks every setting and returns one message per problem.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let q = &self.query;
        let f = &self.fetch;

        if q.provider.trim().is_empty() {
            problems.push("query.provider must not be empty".to_string());
        }
        if !q.min_magnitude.is_finite() || q.min_magnitude < 0.0 {
            problems.push(format!(
                "query.min_magnitude must be a non-negative number, got {}",
                q.min_magnitude
            ));
        }
        if q.limit < 1 {
            problems.push(format!("query.limit must be at least 1, got {}", q.limit));
        }
        if q.max_limit == 0 {
            problems.push("query.max_limit must be at least 1".to_string());
        }
        if q.order_by.parse::<OrderBy>().is_err() {
            problems.push(format!(
                "query.order_by must be one of {}, got {:?}",
                order_by_choices(),
                q.order_by
            ));
        }
        if f.timeout_secs == 0 {
            problems.push("fetch.timeout_secs must be at least 1".to_string());
        }
        if f.max_attempts == 0 {
            problems.push("fetch.max_attempts must be at least 1".to_string());
        }
        if let Some(ref endpoint) = f.usgs_endpoint
            && let Err(e) = Url::parse(endpoint)
        {
            problems.push(format!("fetch.usgs_endpoint is not a valid URL: {}", e));
        }

        problems
    }

    /// Converts the `[fetch]` section into the library configuration.
    pub fn to_fetch_config(&self) -> Result<FetchConfig, String> {
        let f = &self.fetch;
        let mut config = FetchConfig::new()
            .with_timeout(Duration::from_secs(f.timeout_secs))
            .with_cache_ttl(Duration::from_secs(f.cache_ttl_secs))
            .with_retry(RetryPolicy {
                max_attempts: f.max_attempts,
                retry_after_cap: Duration::from_secs(f.retry_after_cap_secs),
                backoff_cap: Duration::from_secs(f.backoff_cap_secs),
            });

        if let Some(capacity) = f.cache_capacity {
            config = config.with_cache_capacity(capacity);
        }
        if let Some(ref endpoint) = f.usgs_endpoint {
            let url = Url::parse(endpoint)
                .map_err(|e| format!("invalid usgs_endpoint {:?}: {}", endpoint, e))?;
            config = config.with_usgs_endpoint(url);
        }

        Ok(config)
    }

    /// Converts the `[query]` section into parameter defaults.
    pub fn to_query_defaults(&self) -> Result<QueryDefaults, String> {
        let q = &self.query;
        let order_by = q
            .order_by
            .parse::<OrderBy>()
            .map_err(|e| format!("invalid order_by: {}", e))?;

        Ok(QueryDefaults {
            provider: q.provider.clone(),
            lookback_days: q.lookback_days,
            min_magnitude: q.min_magnitude,
            limit: q.limit,
            max_limit: q.max_limit,
            order_by,
            max_range_days: q.max_range_days,
        })
    }
}

fn order_by_choices() -> String {
    OrderBy::ALL
        .iter()
        .map(OrderBy::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
