//! Summary statistics over a set of canonical events.

use serde::{Deserialize, Serialize};

use crate::event::CanonicalEvent;

/// Aggregate magnitude statistics for a result set.
///
/// `count` covers every event; the magnitude fields only consider events
/// with a numeric magnitude and are all `None` when there are none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub max_magnitude: Option<f64>,
    pub min_magnitude: Option<f64>,
    pub avg_magnitude: Option<f64>,
}

impl Summary {
    /// Derives the summary for `events`.
    pub fn from_events(events: &[CanonicalEvent]) -> Self {
        let magnitudes: Vec<f64> = events
            .iter()
            .filter_map(|e| e.magnitude)
            .filter(|m| m.is_finite())
            .collect();

        if magnitudes.is_empty() {
            return Self {
                count: events.len(),
                ..Default::default()
            };
        }

        let max = magnitudes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = magnitudes.iter().copied().fold(f64::INFINITY, f64::min);
        let avg = magnitudes.iter().sum::<f64>() / magnitudes.len() as f64;

        Self {
            count: events.len(),
            max_magnitude: Some(max),
            min_magnitude: Some(min),
            avg_magnitude: Some(round2(avg)),
        }
    }

    /// Returns true when no event carried a numeric magnitude.
    pub fn is_empty(&self) -> bool {
        self.max_magnitude.is_none()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(mags: &[Option<f64>]) -> Vec<CanonicalEvent> {
        mags.iter()
            .enumerate()
            .map(|(i, m)| CanonicalEvent {
                magnitude: *m,
                ..CanonicalEvent::new(format!("ev{i}"))
            })
            .collect()
    }

    #[test]
    fn summary_of_three_magnitudes() {
        let s = Summary::from_events(&events(&[Some(5.1), Some(4.2), Some(6.0)]));
        assert_eq!(s.count, 3);
        assert_eq!(s.max_magnitude, Some(6.0));
        assert_eq!(s.min_magnitude, Some(4.2));
        assert_eq!(s.avg_magnitude, Some(5.1));
    }

    #[test]
    fn summary_of_nothing() {
        let s = Summary::from_events(&[]);
        assert_eq!(
            s,
            Summary {
                count: 0,
                max_magnitude: None,
                min_magnitude: None,
                avg_magnitude: None
            }
        );
        assert!(s.is_empty());
    }

    #[test]
    fn count_includes_events_without_magnitude() {
        let s = Summary::from_events(&events(&[None, Some(4.0), None]));
        assert_eq!(s.count, 3);
        assert_eq!(s.max_magnitude, Some(4.0));
        assert_eq!(s.min_magnitude, Some(4.0));
        assert_eq!(s.avg_magnitude, Some(4.0));
    }

    #[test]
    fn all_magnitudes_missing() {
        let s = Summary::from_events(&events(&[None, None]));
        assert_eq!(s.count, 2);
        assert!(s.is_empty());
        assert!(s.avg_magnitude.is_none());
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        let s = Summary::from_events(&events(&[Some(4.0), Some(4.1), Some(4.15)]));
        assert_eq!(s.avg_magnitude, Some(4.08));
        assert!(s.max_magnitude >= s.min_magnitude);
    }

    #[test]
    fn serializes_nulls() {
        let json = serde_json::to_value(Summary::from_events(&[])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "count": 0,
                "max_magnitude": null,
                "min_magnitude": null,
                "avg_magnitude": null
            })
        );
    }
}
