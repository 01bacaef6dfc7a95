//! Online/offline judgment from update recency.

use std::time::Duration;

use chrono::{DateTime, Utc};

use airwatch_types::LivenessState;

/// Whether the station counts as online at `now`.
///
/// Online means the gap since the last reading is within the staleness
/// threshold, closed interval: a gap exactly equal to the threshold is
/// still online. With no reading ever seen there is no gap to measure;
/// that is offline by convention. A reading timestamped in the future
/// yields a negative gap and counts as online.
pub fn is_online(
    now: DateTime<Utc>,
    last_seen: Option<DateTime<Utc>>,
    stale_after: Duration,
) -> bool {
    let Some(last_seen) = last_seen else {
        return false;
    };
    let threshold =
        chrono::Duration::from_std(stale_after).unwrap_or(chrono::Duration::MAX);
    now.signed_duration_since(last_seen) <= threshold
}

/// Full liveness state as of `now`.
pub fn assess(
    now: DateTime<Utc>,
    last_seen: Option<DateTime<Utc>>,
    stale_after: Duration,
) -> LivenessState {
    LivenessState {
        online: is_online(now, last_seen, stale_after),
        last_seen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn gap_equal_to_threshold_is_online() {
        let last_seen = now() - chrono::Duration::seconds(60);
        assert!(is_online(now(), Some(last_seen), Duration::from_secs(60)));
    }

    #[test]
    fn gap_just_past_threshold_is_offline() {
        let last_seen = now() - chrono::Duration::seconds(60) - chrono::Duration::milliseconds(1);
        assert!(!is_online(now(), Some(last_seen), Duration::from_secs(60)));
    }

    #[test]
    fn no_reading_ever_is_offline() {
        assert!(!is_online(now(), None, Duration::from_secs(60)));
        assert_eq!(
            assess(now(), None, Duration::from_secs(60)),
            LivenessState::offline()
        );
    }

    #[test]
    fn future_reading_is_online() {
        let last_seen = now() + chrono::Duration::seconds(10);
        assert!(is_online(now(), Some(last_seen), Duration::from_secs(60)));
    }

    #[test]
    fn assess_carries_last_seen_through() {
        let last_seen = now() - chrono::Duration::seconds(5);
        let state = assess(now(), Some(last_seen), Duration::from_secs(60));
        assert!(state.online);
        assert_eq!(state.last_seen, Some(last_seen));
    }
}
