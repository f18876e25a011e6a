//! Canonical earthquake event records.
//!
//! [`CanonicalEvent`] is the provider-agnostic shape every provider's native
//! record is normalized into. Missing upstream fields stay `None`; they are
//! never replaced by sentinel values such as epoch zero.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One normalized seismic event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    /// Provider event identifier.
    pub id: String,
    /// Magnitude, when the upstream value is numeric.
    pub magnitude: Option<f64>,
    /// Human-readable location description.
    pub place: Option<String>,
    /// Origin time in UTC.
    #[serde(default, with = "utc_time")]
    pub time: Option<DateTime<Utc>>,
    /// Whether a tsunami flag was raised for this event.
    pub tsunami: bool,
    /// Event type (earthquake, quarry blast, explosion...).
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    /// Event detail page.
    pub url: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub depth_km: Option<f64>,
}

impl CanonicalEvent {
    /// Creates an event with only an identifier set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder method to set the magnitude.
    pub fn with_magnitude(mut self, magnitude: f64) -> Self {
        self.magnitude = Some(magnitude);
        self
    }

    /// Builder method to set the place.
    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }

    /// Builder method to set the origin time.
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Builder method to set longitude, latitude and depth.
    pub fn with_coordinates(mut self, longitude: f64, latitude: f64, depth_km: f64) -> Self {
        self.longitude = Some(longitude);
        self.latitude = Some(latitude);
        self.depth_km = Some(depth_km);
        self
    }

    /// Returns the origin time formatted as ISO 8601 with a trailing `Z`.
    pub fn time_iso(&self) -> Option<String> {
        self.time.as_ref().map(format_utc)
    }
}

/// Formats a UTC instant as ISO 8601 with a trailing `Z`.
pub fn format_utc(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

mod utc_time {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&super::format_utc(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<DateTime<Utc>>::deserialize(deserializer)
    }
}
