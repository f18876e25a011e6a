//! EarthquakeProvider trait, registry and fetch pipeline.
//!
//! This crate turns a validated [`Query`](seismic_core::Query) into a
//! [`ResultSet`](seismic_core::ResultSet):
//!
//! - [`registry`] - Resolves a provider identifier to a provider
//! - [`EarthquakeProvider`] - The trait every catalog backend implements
//! - [`Fetcher`] - Shared cache lookup, HTTP GET and 429 retry
//! - [`normalize`] - GeoJSON feature collection to canonical events
//! - [`ProviderError`] - Error types for provider operations
//!
//! # Architecture
//!
//! ```text
//!          "usgs"
//!            │
//!            ▼ registry::build()
//!   ┌──────────────────┐      ┌──────────────┐
//!   │   UsgsProvider   │─────▶│ ResultCache  │ hit: return copy
//!   └────────┬─────────┘      └──────────────┘
//!            │ miss
//!            ▼
//!   ┌──────────────────┐
//!   │  HttpTransport   │ GET, retry on 429
//!   └────────┬─────────┘
//!            │ GeoJSON
//!            ▼ normalize()
//!   ┌──────────────────┐
//!   │    ResultSet     │ events + summary + metadata
//!   └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use seismic_core::Query;
//! use seismic_providers::{FetchConfig, FetchContext, registry};
//!
//! let ctx = FetchContext::new(FetchConfig::default())?;
//! let provider = registry::build("usgs", &ctx)?;
//! let query = Query::parse("2024-01-01", "2024-01-31", 4.0, 80, "time")?;
//! let result = provider.fetch(query).await?;
//! println!("{} events", result.summary.count);
//! ```

pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod fetcher;
pub mod normalize;
pub mod provider;
pub mod raw_feature;
pub mod registry;
pub mod retry;
pub mod testing;
pub mod transport;
pub mod usgs;

// Re-export main types at crate root
pub use cache::{CacheEntry, Clock, ManualClock, ResultCache, SystemClock};
pub use config::FetchConfig;
pub use context::FetchContext;
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use fetcher::Fetcher;
pub use normalize::{normalize_feature, normalize_features};
pub use provider::{BoxFuture, CatalogSource, EarthquakeProvider, SourceInfo};
pub use raw_feature::RawFeature;
pub use registry::ProviderKind;
pub use retry::{RetryPolicy, Sleeper, TokioSleeper, send_with_retry};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
