//! Core types: catalog queries, canonical events, summaries, insights, tracing.

pub mod event;
pub mod insights;
pub mod query;
pub mod result;
pub mod summary;
pub mod tracing;

pub use event::{CanonicalEvent, format_utc};
pub use insights::{BandCount, DayCount, Insights, MagnitudeBand, PlaceCount};
pub use query::{DATE_FORMAT, OrderBy, Query, QueryError};
pub use result::{RequestEcho, ResultMeta, ResultSet};
pub use summary::Summary;
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
