//! Catalog query parameters.
//!
//! A [`Query`] is validated once at construction and never changes afterwards.
//! Capping the limit for a specific provider produces a new value, so the
//! query echoed back in a result is always the one that was actually sent.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date format accepted for `starttime` / `endtime`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised while building a [`Query`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// A date could not be parsed as ISO 8601 `YYYY-MM-DD`.
    #[error("invalid {field} '{value}': expected an ISO 8601 date (YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    /// The start date lies after the end date.
    #[error("starttime {start} is after endtime {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    /// The minimum magnitude is negative or not a finite number.
    #[error("minmagnitude must be a finite number >= 0, got {0}")]
    InvalidMagnitude(f64),

    /// The limit is zero or negative.
    #[error("limit must be a positive integer, got {0}")]
    InvalidLimit(i64),

    /// The ordering is not one the catalog understands.
    #[error("unknown orderby '{0}': expected one of time, time-asc, magnitude, magnitude-asc")]
    InvalidOrderBy(String),
}

/// Result ordering requested from the upstream catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderBy {
    /// Newest first.
    #[default]
    #[serde(rename = "time")]
    Time,
    /// Oldest first.
    #[serde(rename = "time-asc")]
    TimeAsc,
    /// Largest magnitude first.
    #[serde(rename = "magnitude")]
    Magnitude,
    /// Smallest magnitude first.
    #[serde(rename = "magnitude-asc")]
    MagnitudeAsc,
}

impl OrderBy {
    /// All orderings, in catalog documentation order.
    pub const ALL: [OrderBy; 4] = [
        OrderBy::Time,
        OrderBy::TimeAsc,
        OrderBy::Magnitude,
        OrderBy::MagnitudeAsc,
    ];

    /// Returns the wire name of this ordering.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::TimeAsc => "time-asc",
            Self::Magnitude => "magnitude",
            Self::MagnitudeAsc => "magnitude-asc",
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderBy {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| QueryError::InvalidOrderBy(s.to_string()))
    }
}

/// Parameters of one catalog request.
///
/// Deserialization goes through [`Query::new`], so a deserialized query is
/// as valid as a constructed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQuery")]
pub struct Query {
    #[serde(rename = "starttime")]
    start_time: NaiveDate,
    #[serde(rename = "endtime")]
    end_time: NaiveDate,
    #[serde(rename = "minmagnitude")]
    min_magnitude: f64,
    limit: u32,
    #[serde(rename = "orderby")]
    order_by: OrderBy,
}

/// Unchecked wire form of a [`Query`].
#[derive(Deserialize)]
struct RawQuery {
    starttime: NaiveDate,
    endtime: NaiveDate,
    minmagnitude: f64,
    limit: u32,
    #[serde(default)]
    orderby: OrderBy,
}

impl TryFrom<RawQuery> for Query {
    type Error = QueryError;

    fn try_from(raw: RawQuery) -> Result<Self, Self::Error> {
        Self::new(
            raw.starttime,
            raw.endtime,
            raw.minmagnitude,
            raw.limit,
            raw.orderby,
        )
    }
}

impl Query {
    /// Creates a validated query.
    ///
    /// # Errors
    ///
    /// Returns an error if `start_time > end_time`, if `min_magnitude` is
    /// negative or not finite, or if `limit` is zero.
    pub fn new(
        start_time: NaiveDate,
        end_time: NaiveDate,
        min_magnitude: f64,
        limit: u32,
        order_by: OrderBy,
    ) -> Result<Self, QueryError> {
        if start_time > end_time {
            return Err(QueryError::InvertedRange {
                start: start_time,
                end: end_time,
            });
        }
        if !min_magnitude.is_finite() || min_magnitude < 0.0 {
            return Err(QueryError::InvalidMagnitude(min_magnitude));
        }
        if limit == 0 {
            return Err(QueryError::InvalidLimit(0));
        }

        Ok(Self {
            start_time,
            end_time,
            min_magnitude,
            limit,
            order_by,
        })
    }

    /// Creates a query from loosely typed parameters, as received from a
    /// query string or command line.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter fails to parse or validate.
    pub fn parse(
        start_time: &str,
        end_time: &str,
        min_magnitude: f64,
        limit: i64,
        order_by: &str,
    ) -> Result<Self, QueryError> {
        let start = parse_date("starttime", start_time)?;
        let end = parse_date("endtime", end_time)?;
        let limit = u32::try_from(limit)
            .ok()
            .filter(|l| *l > 0)
            .ok_or(QueryError::InvalidLimit(limit))?;
        let order_by = order_by.parse()?;
        Self::new(start, end, min_magnitude, limit, order_by)
    }

    /// Start of the requested range (inclusive).
    pub fn start_time(&self) -> NaiveDate {
        self.start_time
    }

    /// End of the requested range.
    pub fn end_time(&self) -> NaiveDate {
        self.end_time
    }

    /// Minimum magnitude filter.
    pub fn min_magnitude(&self) -> f64 {
        self.min_magnitude
    }

    /// Maximum number of events requested.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Requested ordering.
    pub fn order_by(&self) -> OrderBy {
        self.order_by
    }

    /// Returns a copy of this query with the limit capped at `max`.
    ///
    /// A `max` of zero is treated as one, so the result stays valid.
    #[must_use]
    pub fn capped(&self, max: u32) -> Self {
        Self {
            limit: self.limit.min(max.max(1)),
            ..self.clone()
        }
    }

    /// Returns the query as `(name, value)` pairs using the catalog's
    /// parameter names, sorted by name.
    pub fn params(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("endtime", self.end_time.format(DATE_FORMAT).to_string()),
            ("limit", self.limit.to_string()),
            ("minmagnitude", self.min_magnitude.to_string()),
            ("orderby", self.order_by.as_str().to_string()),
            ("starttime", self.start_time.format(DATE_FORMAT).to_string()),
        ])
    }

    /// Returns the canonical cache key: fields sorted by name, each encoded
    /// as `name=value`, joined by `&`.
    pub fn cache_key(&self) -> String {
        self.params()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| QueryError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_valid_query() {
        let q = Query::parse("2024-01-01", "2024-01-31", 4.5, 80, "magnitude").unwrap();
        assert_eq!(q.start_time(), date(2024, 1, 1));
        assert_eq!(q.end_time(), date(2024, 1, 31));
        assert_eq!(q.min_magnitude(), 4.5);
        assert_eq!(q.limit(), 80);
        assert_eq!(q.order_by(), OrderBy::Magnitude);
    }

    #[test]
    fn same_day_range_is_valid() {
        assert!(Query::parse("2024-03-15", "2024-03-15", 0.0, 1, "time").is_ok());
    }

    #[test]
    fn inverted_range_rejected() {
        let err = Query::parse("2024-02-01", "2024-01-01", 4.0, 10, "time").unwrap_err();
        assert!(matches!(err, QueryError::InvertedRange { .. }));
    }

    #[test]
    fn bad_date_rejected() {
        let err = Query::parse("yesterday", "2024-01-01", 4.0, 10, "time").unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidDate {
                field: "starttime",
                value: "yesterday".to_string()
            }
        );
    }

    #[test]
    fn negative_or_nan_magnitude_rejected() {
        assert!(matches!(
            Query::parse("2024-01-01", "2024-01-02", -0.1, 10, "time"),
            Err(QueryError::InvalidMagnitude(_))
        ));
        assert!(matches!(
            Query::parse("2024-01-01", "2024-01-02", f64::NAN, 10, "time"),
            Err(QueryError::InvalidMagnitude(_))
        ));
    }

    #[test]
    fn non_positive_limit_rejected() {
        assert_eq!(
            Query::parse("2024-01-01", "2024-01-02", 1.0, 0, "time").unwrap_err(),
            QueryError::InvalidLimit(0)
        );
        assert_eq!(
            Query::parse("2024-01-01", "2024-01-02", 1.0, -5, "time").unwrap_err(),
            QueryError::InvalidLimit(-5)
        );
    }

    #[test]
    fn unknown_order_rejected() {
        assert_eq!(
            "newest".parse::<OrderBy>().unwrap_err(),
            QueryError::InvalidOrderBy("newest".to_string())
        );
        for order in OrderBy::ALL {
            assert_eq!(order.as_str().parse::<OrderBy>().unwrap(), order);
        }
    }

    #[test]
    fn cache_key_is_sorted_and_stable() {
        let q = Query::parse("2024-01-01", "2024-01-31", 4.0, 80, "time-asc").unwrap();
        assert_eq!(
            q.cache_key(),
            "endtime=2024-01-31&limit=80&minmagnitude=4&orderby=time-asc&starttime=2024-01-01"
        );
        assert_eq!(q.cache_key(), q.clone().cache_key());
    }

    #[test]
    fn cache_key_distinguishes_queries() {
        let a = Query::parse("2024-01-01", "2024-01-31", 4.0, 80, "time").unwrap();
        let b = Query::parse("2024-01-01", "2024-01-31", 4.5, 80, "time").unwrap();
        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn capped_returns_new_query() {
        let q = Query::parse("2024-01-01", "2024-01-31", 4.0, 900, "time").unwrap();
        let capped = q.capped(500);
        assert_eq!(q.limit(), 900);
        assert_eq!(capped.limit(), 500);
        assert_eq!(q.capped(1000).limit(), 900);
        assert_eq!(q.capped(0).limit(), 1);
    }

    #[test]
    fn serializes_with_catalog_names() {
        let q = Query::parse("2024-01-01", "2024-01-31", 4.0, 80, "magnitude-asc").unwrap();
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["starttime"], "2024-01-01");
        assert_eq!(json["endtime"], "2024-01-31");
        assert_eq!(json["minmagnitude"], 4.0);
        assert_eq!(json["limit"], 80);
        assert_eq!(json["orderby"], "magnitude-asc");

        let back: Query = serde_json::from_value(json).unwrap();
        assert_eq!(back, q);
    }

    #[test]
    fn deserialization_validates() {
        let valid = serde_json::json!({
            "starttime": "2024-01-01",
            "endtime": "2024-01-31",
            "minmagnitude": 4.0,
            "limit": 80,
            "orderby": "time"
        });
        assert!(serde_json::from_value::<Query>(valid.clone()).is_ok());

        for (field, value) in [
            ("limit", serde_json::json!(0)),
            ("starttime", serde_json::json!("2024-02-01")),
            ("minmagnitude", serde_json::json!(-2.0)),
            ("orderby", serde_json::json!("random")),
        ] {
            let mut raw = valid.clone();
            raw[field] = value;
            assert!(
                serde_json::from_value::<Query>(raw).is_err(),
                "{field} should be rejected"
            );
        }

        let err = serde_json::from_value::<Query>(serde_json::json!({
            "starttime": "2024-02-01",
            "endtime": "2024-01-01",
            "minmagnitude": 4.0,
            "limit": 10
        }))
        .unwrap_err();
        assert!(err.to_string().contains("is after endtime"), "{err}");
    }
}
