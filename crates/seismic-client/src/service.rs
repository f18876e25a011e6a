//! String-parameter front door to the fetch pipeline.
//!
//! Parameters arrive the way a query string or command line supplies them:
//! optional strings. This layer applies defaults, parses numbers, clamps the
//! limit, resolves the provider and runs the fetch.

use chrono::{Days, NaiveDate, Utc};
use seismic_core::{DATE_FORMAT, OrderBy, Query, ResultSet};
use seismic_providers::{FetchContext, ProviderError, ProviderKind, ProviderResult, registry};
use tracing::{debug, info};

/// Message returned when `minmagnitude` or `limit` are not numbers.
pub const NUMERIC_PARAMS_MESSAGE: &str = "minmagnitude must be float and limit must be integer";

/// Longest accepted date range, in days, unless configured otherwise.
pub const DEFAULT_MAX_RANGE_DAYS: u32 = 365;

/// Values used for omitted parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDefaults {
    pub provider: String,
    pub lookback_days: u32,
    pub min_magnitude: f64,
    pub limit: i64,
    pub max_limit: u32,
    pub order_by: OrderBy,
    /// Longest accepted `endtime - starttime`, in days.
    pub max_range_days: u32,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            provider: "usgs".to_string(),
            lookback_days: 30,
            min_magnitude: 4.0,
            limit: 80,
            max_limit: 500,
            order_by: OrderBy::Time,
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
        }
    }
}

/// Raw request parameters; `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchParams {
    pub provider: Option<String>,
    pub starttime: Option<String>,
    pub endtime: Option<String>,
    pub minmagnitude: Option<String>,
    pub limit: Option<String>,
    pub orderby: Option<String>,
}

/// A fully resolved request, ready to send to a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub provider: ProviderKind,
    pub query: Query,
}

/// Applies defaults and validation to `params`, with `today` as the
/// reference date for the default range.
///
/// # Errors
///
/// Returns a `Validation` error for unparsable numbers, an invalid query or
/// a date range longer than `max_range_days`, and an `UnknownProvider` error
/// for unregistered provider names.
pub fn resolve_request(
    params: &FetchParams,
    defaults: &QueryDefaults,
    today: NaiveDate,
) -> ProviderResult<ResolvedRequest> {
    let min_magnitude = match params.minmagnitude.as_deref() {
        Some(raw) => raw.trim().parse::<f64>().ok(),
        None => Some(defaults.min_magnitude),
    };
    let limit = match params.limit.as_deref() {
        Some(raw) => parse_limit(raw),
        None => Some(defaults.limit),
    };
    let (Some(min_magnitude), Some(limit)) = (min_magnitude, limit) else {
        return Err(ProviderError::validation(NUMERIC_PARAMS_MESSAGE));
    };

    let provider = registry::resolve(params.provider.as_deref().unwrap_or(&defaults.provider))?;

    let default_start = today
        .checked_sub_days(Days::new(u64::from(defaults.lookback_days)))
        .unwrap_or(NaiveDate::MIN)
        .format(DATE_FORMAT)
        .to_string();
    let default_end = today.format(DATE_FORMAT).to_string();

    let starttime = params.starttime.as_deref().unwrap_or(&default_start);
    let endtime = params.endtime.as_deref().unwrap_or(&default_end);
    let orderby = params
        .orderby
        .as_deref()
        .unwrap_or(defaults.order_by.as_str());

    let limit = clamp_limit(limit, defaults.max_limit);
    let query = Query::parse(starttime, endtime, min_magnitude, limit, orderby)?;

    let range_days = (query.end_time() - query.start_time()).num_days();
    if range_days > i64::from(defaults.max_range_days) {
        return Err(ProviderError::validation(format!(
            "Date range is too large. Please keep it within {} days.",
            defaults.max_range_days
        )));
    }

    debug!(provider = %provider, key = %query.cache_key(), "Resolved request");
    Ok(ResolvedRequest { provider, query })
}

/// Parses an integer limit. Well-formed integers outside the `i64` range
/// saturate, since the result is clamped afterwards anyway.
fn parse_limit(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(limit) = raw.parse::<i64>() {
        return Some(limit);
    }

    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// Clamps a requested limit to `1..=max_limit`.
pub fn clamp_limit(limit: i64, max_limit: u32) -> i64 {
    limit.clamp(1, i64::from(max_limit.max(1)))
}

/// Fetches events for loosely typed parameters.
#[derive(Debug, Clone)]
pub struct EventService {
    ctx: FetchContext,
    defaults: QueryDefaults,
}

impl EventService {
    pub fn new(ctx: FetchContext, defaults: QueryDefaults) -> Self {
        Self { ctx, defaults }
    }

    pub fn defaults(&self) -> &QueryDefaults {
        &self.defaults
    }

    /// Resolves `params` against today's UTC date and fetches the result.
    ///
    /// # Errors
    ///
    /// Caller mistakes come back as `UnknownProvider` or `Validation`;
    /// upstream trouble as `Upstream`, `Network` or `InvalidResponse`.
    pub async fn fetch_events(&self, params: &FetchParams) -> ProviderResult<ResultSet> {
        self.fetch_events_on(params, Utc::now().date_naive()).await
    }

    /// Like [`fetch_events`](Self::fetch_events) with an explicit reference date.
    pub async fn fetch_events_on(
        &self,
        params: &FetchParams,
        today: NaiveDate,
    ) -> ProviderResult<ResultSet> {
        let request = resolve_request(params, &self.defaults, today)?;
        let provider = request.provider.build(&self.ctx);

        info!(
            provider = provider.name(),
            starttime = %request.query.start_time(),
            endtime = %request.query.end_time(),
            limit = request.query.limit(),
            "Fetching earthquakes"
        );

        provider.fetch(request.query).await
    }
}
