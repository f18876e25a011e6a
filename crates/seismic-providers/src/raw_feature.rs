//! Tolerant view over one GeoJSON feature.
//!
//! Upstream records are read field by field from `serde_json::Value` rather
//! than deserialized into a strict struct: a feature with a wrong-typed or
//! missing sub-field still yields an event, with that field set to `None`.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// Borrowed accessor for a single feature object.
#[derive(Debug, Clone, Copy)]
pub struct RawFeature<'a> {
    feature: &'a Value,
}

impl<'a> RawFeature<'a> {
    pub fn new(feature: &'a Value) -> Self {
        Self { feature }
    }

    fn property(&self, name: &str) -> Option<&'a Value> {
        self.feature.get("properties")?.get(name)
    }

    /// Feature identifier; numeric ids are stringified, anything else is empty.
    pub fn id(&self) -> String {
        match self.feature.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    pub fn magnitude(&self) -> Option<f64> {
        self.property("mag").and_then(Value::as_f64)
    }

    pub fn place(&self) -> Option<String> {
        self.string_property("place")
    }

    pub fn event_type(&self) -> Option<String> {
        self.string_property("type")
    }

    pub fn url(&self) -> Option<String> {
        self.string_property("url")
    }

    /// Origin time from the millisecond epoch `time` property.
    ///
    /// Null, zero, absent and non-numeric values all map to `None`.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.property("time")
            .and_then(Value::as_f64)
            .and_then(millis_to_utc)
    }

    /// Tsunami flag, using JSON truthiness; absent means `false`.
    pub fn tsunami(&self) -> bool {
        self.property("tsunami").is_some_and(is_truthy)
    }

    /// `[longitude, latitude, depth_km]`, each `None` when missing.
    pub fn coordinates(&self) -> [Option<f64>; 3] {
        let coords = self
            .feature
            .get("geometry")
            .and_then(|g| g.get("coordinates"))
            .and_then(Value::as_array);

        let at = |i: usize| coords.and_then(|c| c.get(i)).and_then(Value::as_f64);
        [at(0), at(1), at(2)]
    }

    fn string_property(&self, name: &str) -> Option<String> {
        self.property(name).and_then(Value::as_str).map(String::from)
    }
}

/// Converts epoch milliseconds to a UTC instant. Zero is treated as missing.
fn millis_to_utc(ms: f64) -> Option<DateTime<Utc>> {
    if ms == 0.0 || !ms.is_finite() {
        return None;
    }
    let secs = (ms / 1000.0).floor();
    let nanos = ((ms - secs * 1000.0) * 1_000_000.0).round().clamp(0.0, 999_999_999.0);
    Utc.timestamp_opt(secs as i64, nanos as u32).single()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
