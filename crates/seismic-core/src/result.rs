//! Normalized fetch results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::event::CanonicalEvent;
use crate::query::Query;
use crate::summary::Summary;

/// The request as it was sent upstream: the query plus the payload format
/// asked of the catalog, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEcho {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(flatten)]
    pub query: Query,
}

impl RequestEcho {
    pub fn new(query: Query) -> Self {
        Self {
            format: None,
            query,
        }
    }

    /// Builder method to set the payload format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

impl From<Query> for RequestEcho {
    fn from(query: Query) -> Self {
        Self::new(query)
    }
}

/// Request echo and source attribution attached to a [`ResultSet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMeta {
    /// The request that was sent upstream.
    pub requested: RequestEcho,
    /// Human-readable name of the data source.
    pub source: String,
    /// Link to the upstream API documentation.
    pub documentation: String,
}

/// The canonical result of one catalog fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Identifier of the provider that produced this result.
    pub provider: String,
    pub meta: ResultMeta,
    pub summary: Summary,
    /// Events in upstream order.
    pub events: Vec<CanonicalEvent>,
    /// Upstream metadata object, passed through untouched.
    pub raw_metadata: Map<String, Value>,
}

impl ResultSet {
    /// Builds a result set, deriving the summary from `events`.
    pub fn new(
        provider: impl Into<String>,
        meta: ResultMeta,
        events: Vec<CanonicalEvent>,
        raw_metadata: Map<String, Value>,
    ) -> Self {
        Self {
            provider: provider.into(),
            meta,
            summary: Summary::from_events(&events),
            events,
            raw_metadata,
        }
    }

    /// Returns the echoed query.
    pub fn query(&self) -> &Query {
        &self.meta.requested.query
    }

    /// Returns true when the upstream returned no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
