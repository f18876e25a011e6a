//! GeoJSON payload to [`ResultSet`] conversion pipeline.
//!
//! The normalization process:
//! 1. Reads the top-level `features` array (missing or malformed means no events)
//! 2. Converts each feature to a [`CanonicalEvent`] via [`RawFeature`], in payload order
//! 3. Passes the top-level `metadata` object through untouched
//! 4. Derives the [`Summary`](seismic_core::Summary) from the events
//!
//! Nothing here fails: record defects degrade single fields to `None`.

use seismic_core::{CanonicalEvent, Query, RequestEcho, ResultMeta, ResultSet};
use serde_json::{Map, Value};
use tracing::debug;

use crate::provider::SourceInfo;
use crate::raw_feature::RawFeature;

/// Converts one GeoJSON feature to a [`CanonicalEvent`].
pub fn normalize_feature(feature: &Value) -> CanonicalEvent {
    let raw = RawFeature::new(feature);
    let [longitude, latitude, depth_km] = raw.coordinates();

    CanonicalEvent {
        id: raw.id(),
        magnitude: raw.magnitude(),
        place: raw.place(),
        time: raw.time(),
        tsunami: raw.tsunami(),
        event_type: raw.event_type(),
        url: raw.url(),
        longitude,
        latitude,
        depth_km,
    }
}

/// Converts every feature of a GeoJSON feature collection, preserving order.
pub fn normalize_features(payload: &Value) -> Vec<CanonicalEvent> {
    payload
        .get("features")
        .and_then(Value::as_array)
        .map(|features| features.iter().map(normalize_feature).collect())
        .unwrap_or_default()
}

/// Builds the complete result set for a GeoJSON payload.
pub fn normalize(payload: &Value, query: Query, info: SourceInfo) -> ResultSet {
    let events = normalize_features(payload);
    let raw_metadata = payload
        .get("metadata")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Map::new);

    debug!(provider = info.name, events = events.len(), "Normalized payload");

    ResultSet::new(
        info.name,
        ResultMeta {
            requested: RequestEcho {
                format: info.format.map(str::to_string),
                query,
            },
            source: info.label.to_string(),
            documentation: info.documentation.to_string(),
        },
        events,
        raw_metadata,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const INFO: SourceInfo = SourceInfo {
        name: "test",
        label: "Test Catalog",
        documentation: "https://example.org/docs",
        format: Some("geojson"),
    };

    fn query() -> Query {
        Query::parse("2024-01-01", "2024-01-31", 4.0, 80, "time").unwrap()
    }

    fn feature(id: &str, mag: Value) -> Value {
        json!({
            "type": "Feature",
            "id": id,
            "properties": { "mag": mag, "time": 1_704_067_200_000_i64 },
            "geometry": { "type": "Point", "coordinates": [1.0, 2.0, 3.0] }
        })
    }

    #[test]
    fn three_events_summary() {
        let payload = json!({
            "features": [feature("a", json!(5.1)), feature("b", json!(4.2)), feature("c", json!(6.0))]
        });
        let rs = normalize(&payload, query(), INFO);

        assert_eq!(rs.summary.count, 3);
        assert_eq!(rs.summary.max_magnitude, Some(6.0));
        assert_eq!(rs.summary.min_magnitude, Some(4.2));
        assert_eq!(rs.summary.avg_magnitude, Some(5.1));
    }

    #[test]
    fn order_is_preserved() {
        let payload = json!({
            "features": [feature("z", json!(3.0)), feature("a", json!(7.0)), feature("m", json!(5.0))]
        });
        let ids: Vec<_> = normalize(&payload, query(), INFO)
            .events
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }

    #[test]
    fn count_includes_non_numeric_magnitudes() {
        let payload = json!({
            "features": [feature("a", json!(null)), feature("b", json!("big")), feature("c", json!(4.4))]
        });
        let rs = normalize(&payload, query(), INFO);

        assert_eq!(rs.summary.count, rs.events.len());
        assert_eq!(rs.summary.count, 3);
        assert_eq!(rs.summary.max_magnitude, Some(4.4));
        assert!(rs.events[1].magnitude.is_none());
    }

    #[test]
    fn missing_features_is_empty_not_error() {
        for payload in [json!({}), json!({"features": null}), json!({"features": {}}), json!([])] {
            let rs = normalize(&payload, query(), INFO);
            assert!(rs.events.is_empty());
            assert_eq!(rs.summary.count, 0);
            assert!(rs.summary.max_magnitude.is_none());
            assert!(rs.summary.min_magnitude.is_none());
            assert!(rs.summary.avg_magnitude.is_none());
            assert!(rs.raw_metadata.is_empty());
        }
    }

    #[test]
    fn null_time_is_not_epoch() {
        let payload = json!({
            "features": [{ "id": "a", "properties": { "time": null } }]
        });
        let rs = normalize(&payload, query(), INFO);
        assert!(rs.events[0].time.is_none());
    }

    #[test]
    fn missing_geometry_nulls_coordinates() {
        let payload = json!({
            "features": [{ "id": "a", "properties": { "mag": 4.0 } }]
        });
        let event = &normalize(&payload, query(), INFO).events[0];
        assert!(event.longitude.is_none());
        assert!(event.latitude.is_none());
        assert!(event.depth_km.is_none());
    }

    #[test]
    fn metadata_passes_through() {
        let payload = json!({
            "metadata": { "generated": 1_704_067_200_000_i64, "count": 0, "title": "USGS Earthquakes" },
            "features": []
        });
        let rs = normalize(&payload, query(), INFO);
        assert_eq!(rs.raw_metadata["title"], "USGS Earthquakes");
        assert_eq!(rs.raw_metadata["count"], 0);
    }

    #[test]
    fn meta_echoes_query_and_source() {
        let rs = normalize(&json!({"features": []}), query(), INFO);
        assert_eq!(rs.provider, "test");
        assert_eq!(rs.meta.source, "Test Catalog");
        assert_eq!(rs.meta.documentation, "https://example.org/docs");
        assert_eq!(rs.query(), &query());
        assert_eq!(rs.meta.requested.format.as_deref(), Some("geojson"));
    }

    #[test]
    fn normalized_event_snapshot() {
        let event = normalize_feature(&json!({
            "type": "Feature",
            "id": "ci40600448",
            "properties": {
                "mag": 4.3,
                "place": "12 km NE of Ridgecrest, CA",
                "time": 1_704_067_200_250_i64,
                "tsunami": 0,
                "type": "earthquake",
                "url": "https://earthquake.usgs.gov/earthquakes/eventpage/ci40600448"
            },
            "geometry": { "type": "Point", "coordinates": [-117.6, 35.7, 7.5] }
        }));
        insta::assert_json_snapshot!(event, @r###"
        {
          "id": "ci40600448",
          "magnitude": 4.3,
          "place": "12 km NE of Ridgecrest, CA",
          "time": "2024-01-01T00:00:00.250Z",
          "tsunami": false,
          "type": "earthquake",
          "url": "https://earthquake.usgs.gov/earthquakes/eventpage/ci40600448",
          "longitude": -117.6,
          "latitude": 35.7,
          "depth_km": 7.5
        }
        "###);
    }
}
