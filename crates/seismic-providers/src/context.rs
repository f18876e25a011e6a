//! Shared fetch infrastructure handed to every provider.

use std::sync::Arc;

use crate::cache::ResultCache;
use crate::config::FetchConfig;
use crate::error::ProviderResult;
use crate::fetcher::Fetcher;
use crate::retry::{Sleeper, TokioSleeper};
use crate::transport::{HttpTransport, ReqwestTransport};

/// One HTTP client, one timer and one result cache, shared by all providers
/// built from the same context.
#[derive(Clone)]
pub struct FetchContext {
    config: FetchConfig,
    transport: Arc<dyn HttpTransport>,
    sleeper: Arc<dyn Sleeper>,
    cache: Arc<ResultCache>,
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl FetchContext {
    /// Creates a context talking to the real network.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: FetchConfig) -> ProviderResult<Self> {
        let transport = Arc::new(ReqwestTransport::new()?);
        let cache = Arc::new(config.build_cache());
        Ok(Self::with_parts(config, transport, Arc::new(TokioSleeper), cache))
    }

    /// Assembles a context from explicit parts.
    pub fn with_parts(
        config: FetchConfig,
        transport: Arc<dyn HttpTransport>,
        sleeper: Arc<dyn Sleeper>,
        cache: Arc<ResultCache>,
    ) -> Self {
        Self {
            config,
            transport,
            sleeper,
            cache,
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Returns a fetcher sharing this context's transport, timer and cache.
    pub fn fetcher(&self) -> Fetcher {
        Fetcher::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.sleeper),
            Arc::clone(&self.cache),
            self.config.retry,
            self.config.timeout,
        )
    }
}
