//! Dashboard breakdowns over a set of canonical events.
//!
//! Four views complement the [`Summary`](crate::Summary):
//!
//! - **Magnitude mix**: how many events fall in each [`MagnitudeBand`]
//! - **Top locations**: the most frequent places, unnamed ones grouped as `Unknown`
//! - **Daily trend**: event counts for the most recent UTC days that have events
//! - **Tsunami flags**: how many events raised a tsunami flag
//!
//! Everything here is a pure function of the event slice.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::event::CanonicalEvent;

/// Number of places listed by [`top_places`] in [`Insights`].
pub const TOP_PLACES: usize = 12;
/// Number of days listed by [`daily_trend`] in [`Insights`].
pub const TREND_DAYS: usize = 10;
/// Place label for events without one.
pub const UNKNOWN_PLACE: &str = "Unknown";

/// Coarse magnitude classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MagnitudeBand {
    /// Below 4.0.
    Minor,
    /// From 4.0 up to, but excluding, 6.0.
    Moderate,
    /// 6.0 and above.
    Strong,
}

impl MagnitudeBand {
    pub const ALL: [MagnitudeBand; 3] = [Self::Minor, Self::Moderate, Self::Strong];

    /// Classifies a magnitude. NaN belongs to no band.
    pub fn of(magnitude: f64) -> Option<Self> {
        if magnitude.is_nan() {
            None
        } else if magnitude < 4.0 {
            Some(Self::Minor)
        } else if magnitude < 6.0 {
            Some(Self::Moderate)
        } else {
            Some(Self::Strong)
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Minor => "Minor (<4.0)",
            Self::Moderate => "Moderate (4.0-5.9)",
            Self::Strong => "Strong (>=6.0)",
        }
    }
}

/// Number of events in one magnitude band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandCount {
    pub band: MagnitudeBand,
    pub count: usize,
    /// Share of all events, rounded to a whole percent.
    pub percent: u32,
}

/// Number of events at one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceCount {
    pub place: String,
    pub count: usize,
}

/// Number of events on one UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub day: NaiveDate,
    pub count: usize,
}

/// Counts events per magnitude band, always returning all three bands.
///
/// Percentages are relative to every event, including those without a
/// magnitude, so they may add up to less than 100.
pub fn magnitude_mix(events: &[CanonicalEvent]) -> Vec<BandCount> {
    let total = events.len().max(1);

    MagnitudeBand::ALL
        .into_iter()
        .map(|band| {
            let count = events
                .iter()
                .filter(|e| e.magnitude.and_then(MagnitudeBand::of) == Some(band))
                .count();
            let percent = (count as f64 * 100.0 / total as f64).round_ties_even() as u32;
            BandCount {
                band,
                count,
                percent,
            }
        })
        .collect()
}

/// Returns the `n` most frequent places, most frequent first.
///
/// Ties are listed alphabetically. Events without a place count as
/// [`UNKNOWN_PLACE`].
pub fn top_places(events: &[CanonicalEvent], n: usize) -> Vec<PlaceCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for event in events {
        *counts
            .entry(event.place.as_deref().unwrap_or(UNKNOWN_PLACE))
            .or_default() += 1;
    }

    let mut places: Vec<PlaceCount> = counts
        .into_iter()
        .map(|(place, count)| PlaceCount {
            place: place.to_string(),
            count,
        })
        .collect();
    places.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.place.cmp(&b.place)));
    places.truncate(n);
    places
}

/// Returns per-day counts for the `n` most recent UTC days with events,
/// oldest first. Events without a time are ignored.
pub fn daily_trend(events: &[CanonicalEvent], n: usize) -> Vec<DayCount> {
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for time in events.iter().filter_map(|e| e.time) {
        *days.entry(time.date_naive()).or_default() += 1;
    }

    let skip = days.len().saturating_sub(n);
    days.into_iter()
        .skip(skip)
        .map(|(day, count)| DayCount { day, count })
        .collect()
}

/// Counts events that raised a tsunami flag.
pub fn tsunami_count(events: &[CanonicalEvent]) -> usize {
    events.iter().filter(|e| e.tsunami).count()
}

/// All dashboard breakdowns for one result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub tsunami_flags: usize,
    pub magnitude_mix: Vec<BandCount>,
    pub top_places: Vec<PlaceCount>,
    pub daily_trend: Vec<DayCount>,
}

impl Insights {
    pub fn from_events(events: &[CanonicalEvent]) -> Self {
        Self {
            tsunami_flags: tsunami_count(events),
            magnitude_mix: magnitude_mix(events),
            top_places: top_places(events, TOP_PLACES),
            daily_trend: daily_trend(events, TREND_DAYS),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn with_mag(mag: f64) -> CanonicalEvent {
        CanonicalEvent::new("m").with_magnitude(mag)
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> CanonicalEvent {
        CanonicalEvent::new("t").with_time(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
    }

    fn counts(mix: &[BandCount]) -> Vec<usize> {
        mix.iter().map(|b| b.count).collect()
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(MagnitudeBand::of(3.99), Some(MagnitudeBand::Minor));
        assert_eq!(MagnitudeBand::of(4.0), Some(MagnitudeBand::Moderate));
        assert_eq!(MagnitudeBand::of(5.99), Some(MagnitudeBand::Moderate));
        assert_eq!(MagnitudeBand::of(6.0), Some(MagnitudeBand::Strong));
        assert_eq!(MagnitudeBand::of(-0.5), Some(MagnitudeBand::Minor));
        assert_eq!(MagnitudeBand::of(f64::NAN), None);
    }

    #[test]
    fn mix_counts_and_percentages() {
        let events = vec![with_mag(3.9), with_mag(4.0), with_mag(5.9), with_mag(6.0)];
        let mix = magnitude_mix(&events);

        assert_eq!(
            mix.iter().map(|b| b.band).collect::<Vec<_>>(),
            MagnitudeBand::ALL.to_vec()
        );
        assert_eq!(counts(&mix), vec![1, 2, 1]);
        assert_eq!(mix.iter().map(|b| b.percent).collect::<Vec<_>>(), vec![25, 50, 25]);
    }

    #[test]
    fn mix_percent_includes_events_without_magnitude() {
        let events = vec![with_mag(6.5), CanonicalEvent::new("none")];
        let mix = magnitude_mix(&events);
        assert_eq!(counts(&mix), vec![0, 0, 1]);
        assert_eq!(mix[2].percent, 50);
    }

    #[test]
    fn mix_percent_rounds_half_to_even() {
        let mut events = vec![with_mag(7.0)];
        events.extend((0..7).map(|_| CanonicalEvent::new("none")));
        assert_eq!(magnitude_mix(&events)[2].percent, 12);
    }

    #[test]
    fn mix_of_nothing_is_three_zero_rows() {
        let mix = magnitude_mix(&[]);
        assert_eq!(counts(&mix), vec![0, 0, 0]);
        assert!(mix.iter().all(|b| b.percent == 0));
    }

    #[test]
    fn top_places_groups_missing_place_as_unknown() {
        let events = vec![
            CanonicalEvent::new("a").with_place("Tonga"),
            CanonicalEvent::new("b"),
            CanonicalEvent::new("c").with_place("Chile"),
            CanonicalEvent::new("d"),
            CanonicalEvent::new("e").with_place("Tonga"),
            CanonicalEvent::new("f"),
        ];

        assert_eq!(
            top_places(&events, TOP_PLACES),
            vec![
                PlaceCount {
                    place: "Unknown".to_string(),
                    count: 3
                },
                PlaceCount {
                    place: "Tonga".to_string(),
                    count: 2
                },
                PlaceCount {
                    place: "Chile".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn top_places_keeps_the_most_frequent() {
        let events: Vec<_> = (0..20)
            .flat_map(|i| {
                let place = format!("place {i:02}");
                (0..=i).map(move |_| CanonicalEvent::new("x").with_place(place.clone()))
            })
            .collect();

        let top = top_places(&events, TOP_PLACES);
        assert_eq!(top.len(), 12);
        assert_eq!(top[0].place, "place 19");
        assert_eq!(top[0].count, 20);
        assert_eq!(top[11].place, "place 08");
        assert!(top_places(&[], TOP_PLACES).is_empty());
    }

    #[test]
    fn trend_keeps_recent_days_in_ascending_order() {
        let mut events: Vec<_> = (1..=12).map(|d| at(2024, 1, d, 12)).collect();
        events.push(at(2024, 1, 12, 23));
        events.push(CanonicalEvent::new("no time"));

        let trend = daily_trend(&events, TREND_DAYS);

        assert_eq!(trend.len(), 10);
        assert_eq!(trend[0].day, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(
            trend[9],
            DayCount {
                day: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
                count: 2
            }
        );
        assert!(trend.windows(2).all(|w| w[0].day < w[1].day));
    }

    #[test]
    fn trend_uses_utc_days_and_skips_gaps() {
        let events = vec![at(2024, 2, 1, 0), at(2024, 1, 31, 23), at(2024, 2, 5, 6)];
        let days: Vec<_> = daily_trend(&events, TREND_DAYS)
            .into_iter()
            .map(|d| d.day.to_string())
            .collect();
        assert_eq!(days, ["2024-01-31", "2024-02-01", "2024-02-05"]);
        assert!(daily_trend(&[], TREND_DAYS).is_empty());
    }

    #[test]
    fn tsunami_flags_are_counted() {
        let flagged = CanonicalEvent {
            tsunami: true,
            ..CanonicalEvent::new("t")
        };
        assert_eq!(tsunami_count(&[flagged.clone(), CanonicalEvent::new("n"), flagged]), 2);
        assert_eq!(tsunami_count(&[]), 0);
    }

    #[test]
    fn insights_of_nothing() {
        let insights = Insights::from_events(&[]);
        assert_eq!(insights.tsunami_flags, 0);
        assert_eq!(counts(&insights.magnitude_mix), vec![0, 0, 0]);
        assert!(insights.top_places.is_empty());
        assert!(insights.daily_trend.is_empty());
    }
}
