//! USGS provider implementation.

use seismic_core::{DATE_FORMAT, Query, ResultSet};
use serde_json::Value;
use tracing::info;

use crate::context::FetchContext;
use crate::error::ProviderResult;
use crate::fetcher::Fetcher;
use crate::normalize::normalize;
use crate::provider::{BoxFuture, CatalogSource, EarthquakeProvider, SourceInfo};

/// Registry identifier.
pub const NAME: &str = "usgs";
pub const LABEL: &str = "USGS Earthquake Catalog API";
pub const DOCUMENTATION: &str = "https://earthquake.usgs.gov/fdsnws/event/1/";
pub const ENDPOINT: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";
/// Payload format requested from the event service.
pub const FORMAT: &str = "geojson";
/// Largest `limit` the FDSN event service accepts.
pub const MAX_LIMIT: u32 = 20_000;

/// Fetches events from the USGS FDSN event service.
#[derive(Debug, Clone)]
pub struct UsgsProvider {
    endpoint: String,
    fetcher: Fetcher,
}

impl UsgsProvider {
    /// Creates a provider using the context's shared fetch infrastructure.
    ///
    /// The endpoint comes from the context configuration when overridden.
    pub fn new(ctx: &FetchContext) -> Self {
        let endpoint = ctx
            .config()
            .usgs_endpoint
            .as_ref()
            .map_or_else(|| ENDPOINT.to_string(), |url| url.to_string());

        if endpoint != ENDPOINT {
            info!(endpoint = %endpoint, "Using custom USGS endpoint");
        }

        Self {
            endpoint,
            fetcher: ctx.fetcher(),
        }
    }
}

impl CatalogSource for UsgsProvider {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: NAME,
            label: LABEL,
            documentation: DOCUMENTATION,
            format: Some(FORMAT),
        }
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn max_limit(&self) -> u32 {
        MAX_LIMIT
    }

    fn native_params(&self, query: &Query) -> Vec<(String, String)> {
        vec![
            ("format".to_string(), FORMAT.to_string()),
            (
                "starttime".to_string(),
                query.start_time().format(DATE_FORMAT).to_string(),
            ),
            (
                "endtime".to_string(),
                query.end_time().format(DATE_FORMAT).to_string(),
            ),
            (
                "minmagnitude".to_string(),
                query.min_magnitude().to_string(),
            ),
            ("limit".to_string(), query.limit().to_string()),
            ("orderby".to_string(), query.order_by().as_str().to_string()),
        ]
    }

    fn normalize(&self, payload: &Value, query: Query) -> ResultSet {
        normalize(payload, query, self.info())
    }
}

impl EarthquakeProvider for UsgsProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn max_limit(&self) -> u32 {
        MAX_LIMIT
    }

    fn fetch(&self, query: Query) -> BoxFuture<'_, ProviderResult<ResultSet>> {
        Box::pin(async move { self.fetcher.fetch(self, &query).await })
    }
}
