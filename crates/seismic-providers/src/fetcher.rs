//! Cached, throttling-aware fetch of one catalog query.

use std::sync::Arc;
use std::time::Duration;

use seismic_core::{Query, ResultSet};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::ResultCache;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::CatalogSource;
use crate::retry::{RetryPolicy, Sleeper, send_with_retry};
use crate::transport::{HttpRequest, HttpTransport};

/// Executes catalog queries for a provider.
///
/// The flow for one call:
/// 1. cap the query limit at the source maximum and derive the cache key
/// 2. serve a fresh cache entry if there is one
/// 3. otherwise GET the endpoint, retrying on 429
/// 4. map HTTP error statuses to `Upstream` errors
/// 5. parse, normalize, cache and return
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn HttpTransport>,
    sleeper: Arc<dyn Sleeper>,
    cache: Arc<ResultCache>,
    retry: RetryPolicy,
    timeout: Duration,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("cache", &self.cache)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Fetcher {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        sleeper: Arc<dyn Sleeper>,
        cache: Arc<ResultCache>,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            sleeper,
            cache,
            retry,
            timeout,
        }
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Fetches `query` from `source`.
    ///
    /// # Errors
    ///
    /// `Network` when no response arrives, `Upstream` for any status >= 400
    /// left after retries, `InvalidResponse` when a 2xx body is not JSON.
    pub async fn fetch(&self, source: &dyn CatalogSource, query: &Query) -> ProviderResult<ResultSet> {
        let info = source.info();
        let query = query.capped(source.max_limit());
        let key = format!("{}?{}", info.name, query.cache_key());

        if let Some(hit) = self.cache.get(&key) {
            debug!(provider = info.name, key = %key, "Serving cached result");
            return Ok(hit);
        }
        debug!(provider = info.name, key = %key, "Cache miss");

        let request = HttpRequest {
            url: source.endpoint().to_string(),
            params: source.native_params(&query),
            timeout: self.timeout,
        };

        let response = send_with_retry(
            self.transport.as_ref(),
            self.sleeper.as_ref(),
            &self.retry,
            &request,
        )
        .await
        .map_err(|e| e.with_provider(info.name))?;

        if response.is_error() {
            warn!(
                provider = info.name,
                status = response.status,
                "Upstream request failed"
            );
            return Err(ProviderError::upstream(response.status, response.body).with_provider(info.name));
        }

        let payload: Value = serde_json::from_str(&response.body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
                .with_provider(info.name)
                .with_source(e)
        })?;

        let result = source.normalize(&payload, query);
        self.cache.insert(key, result.clone());
        Ok(result)
    }
}
