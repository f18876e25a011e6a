//! USGS earthquake catalog provider.
//!
//! Queries the FDSN event web service at
//! `https://earthquake.usgs.gov/fdsnws/event/1/query` with `format=geojson`
//! and normalizes the returned feature collection.
//!
//! # Example
//!
//! ```ignore
//! use seismic_providers::{FetchConfig, FetchContext, usgs::UsgsProvider};
//!
//! let ctx = FetchContext::new(FetchConfig::default())?;
//! let provider = UsgsProvider::new(&ctx);
//! let result = provider.fetch(query).await?;
//! ```

mod provider;

pub use provider::{DOCUMENTATION, ENDPOINT, FORMAT, LABEL, MAX_LIMIT, NAME, UsgsProvider};
