//! Horizon filtering of historical series.

use chrono::{DateTime, Utc};

use airwatch_types::{Horizon, Reading};

/// Filter `readings` to the given horizon, sorted ascending by timestamp.
///
/// The live horizon keeps the `live_count` most recent points regardless of
/// age; duration horizons keep every point within the look-back window,
/// boundary inclusive. Input order does not matter (the sort is stable, so
/// equal timestamps keep their input order), and an empty input or an empty
/// result is a defined state, not a failure.
///
/// Readings whose metric values are absent are kept: presence is a
/// per-metric concern for the consumer, not a filtering criterion here.
pub fn filter(
    readings: &[Reading],
    horizon: Horizon,
    now: DateTime<Utc>,
    live_count: usize,
) -> Vec<Reading> {
    let mut sorted: Vec<Reading> = readings.to_vec();
    sorted.sort_by_key(|r| r.timestamp);

    match horizon.duration() {
        None => {
            let skip = sorted.len().saturating_sub(live_count);
            sorted.split_off(skip)
        }
        Some(window) => {
            sorted.retain(|r| now.signed_duration_since(r.timestamp) <= window);
            sorted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn reading_secs_ago(secs: i64) -> Reading {
        Reading::new(now() - chrono::Duration::seconds(secs)).with_temperature(20.0)
    }

    #[test]
    fn duration_horizon_boundary_is_inclusive() {
        let edge = reading_secs_ago(24 * 3600);
        let inside = reading_secs_ago(3600);
        let outside = reading_secs_ago(24 * 3600 + 1);

        let result = filter(&[outside, edge, inside], Horizon::Hours24, now(), 20);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].timestamp, edge.timestamp);
        assert_eq!(result[1].timestamp, inside.timestamp);
    }

    #[test]
    fn duration_horizon_keeps_every_qualifying_point() {
        let readings: Vec<Reading> = (0..100).map(|i| reading_secs_ago(i * 3600)).collect();

        let result = filter(&readings, Horizon::Hours24, now(), 20);

        // 0..=24 hours ago qualify
        assert_eq!(result.len(), 25);
        for reading in &result {
            assert!(now().signed_duration_since(reading.timestamp) <= chrono::Duration::hours(24));
        }
    }

    #[test]
    fn live_horizon_keeps_most_recent_count() {
        let readings: Vec<Reading> = (0..50).map(|i| reading_secs_ago(i * 86_400)).collect();

        let result = filter(&readings, Horizon::Live, now(), 20);

        // Count-bounded, not time-bounded: ancient points still qualify
        assert_eq!(result.len(), 20);
        assert_eq!(result.last().unwrap().timestamp, readings[0].timestamp);
        assert!(result.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn live_horizon_with_short_series_returns_all() {
        let readings = vec![reading_secs_ago(10), reading_secs_ago(5)];
        let result = filter(&readings, Horizon::Live, now(), 20);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn unsorted_input_comes_out_ascending() {
        let readings = vec![
            reading_secs_ago(10),
            reading_secs_ago(30),
            reading_secs_ago(20),
        ];

        let result = filter(&readings, Horizon::Days30, now(), 20);

        let timestamps: Vec<_> = result.iter().map(|r| r.timestamp).collect();
        let mut expected = timestamps.clone();
        expected.sort();
        assert_eq!(timestamps, expected);
    }

    #[test]
    fn empty_input_is_fine() {
        assert!(filter(&[], Horizon::Live, now(), 20).is_empty());
        assert!(filter(&[], Horizon::Days7, now(), 20).is_empty());
    }

    #[test]
    fn empty_result_is_fine() {
        let old = reading_secs_ago(40 * 86_400);
        assert!(filter(&[old], Horizon::Days30, now(), 20).is_empty());
    }

    #[test]
    fn absent_metric_values_are_preserved() {
        let blank = Reading::new(now() - chrono::Duration::seconds(5));
        let result = filter(&[blank], Horizon::Hours24, now(), 20);
        assert_eq!(result.len(), 1);
        assert!(result[0].is_empty());
    }
}
