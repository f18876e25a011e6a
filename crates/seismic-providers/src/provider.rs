//! EarthquakeProvider trait definition.
//!
//! Two traits meet here:
//!
//! - [`EarthquakeProvider`] is what callers hold: give it a [`Query`], get a
//!   [`ResultSet`] back.
//! - [`CatalogSource`] is what a provider tells the shared [`Fetcher`](crate::Fetcher)
//!   about itself: where the catalog lives, how queries map onto its native
//!   parameters, and how its payload is normalized.

use std::future::Future;
use std::pin::Pin;

use seismic_core::{Query, ResultSet};
use serde_json::Value;

use crate::error::ProviderResult;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the traits object-safe so providers can be stored as
/// `Box<dyn EarthquakeProvider>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Static description of an upstream catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceInfo {
    /// Registry identifier, e.g. `"usgs"`.
    pub name: &'static str,
    /// Human-readable source name.
    pub label: &'static str,
    /// Upstream API documentation.
    pub documentation: &'static str,
    /// Payload format requested upstream, echoed in the result.
    pub format: Option<&'static str>,
}

/// The catalog-specific half of a provider, consumed by the fetcher.
pub trait CatalogSource: Send + Sync {
    fn info(&self) -> SourceInfo;

    /// Full URL of the query endpoint.
    fn endpoint(&self) -> &str;

    /// Largest `limit` the catalog accepts.
    fn max_limit(&self) -> u32;

    /// Translates a query into the catalog's native query-string pairs.
    fn native_params(&self, query: &Query) -> Vec<(String, String)>;

    /// Converts a parsed payload into a result set. Must not fail.
    fn normalize(&self, payload: &Value, query: Query) -> ResultSet;
}

/// The core abstraction for earthquake data providers.
///
/// # Example Implementation
///
/// ```ignore
/// impl EarthquakeProvider for MyProvider {
///     fn name(&self) -> &str { "mine" }
///     fn max_limit(&self) -> u32 { 1000 }
///     fn fetch(&self, query: Query) -> BoxFuture<'_, ProviderResult<ResultSet>> {
///         Box::pin(async move { self.fetcher.fetch(self, &query).await })
///     }
/// }
/// ```
pub trait EarthquakeProvider: Send + Sync {
    /// Returns the registry identifier of this provider.
    fn name(&self) -> &str;

    /// Largest `limit` this provider will send upstream; larger requests are capped.
    fn max_limit(&self) -> u32;

    /// Fetches events matching `query`.
    ///
    /// # Errors
    ///
    /// Returns a `ProviderError` with code `Upstream`, `Network` or
    /// `InvalidResponse` when the catalog cannot be read.
    fn fetch(&self, query: Query) -> BoxFuture<'_, ProviderResult<ResultSet>>;
}
