//! Engine-owned state and the published derived-state contract.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use airwatch_types::{Horizon, LivenessState, Metric, MetricConfig, Reading, Trend};

use crate::derive;

/// The historical series, keyed by timestamp.
///
/// Keys are unique; inserting at an existing timestamp overwrites (last
/// write wins). Iteration is ascending by timestamp regardless of arrival
/// order, so late-arriving historical records slot into place. The engine
/// is the sole mutator; everything else sees cloned read-only views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesStore {
    readings: BTreeMap<DateTime<Utc>, Reading>,
}

impl SeriesStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the reading at its timestamp.
    ///
    /// Returns true if the store changed - a new timestamp, or different
    /// values at an existing one. Re-ingesting an identical reading is a
    /// no-op.
    pub fn insert(&mut self, reading: Reading) -> bool {
        match self.readings.get(&reading.timestamp) {
            Some(existing) if *existing == reading => false,
            _ => {
                self.readings.insert(reading.timestamp, reading);
                true
            }
        }
    }

    /// Number of stored readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// True if no reading has been stored.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// The reading with the greatest timestamp, if any.
    pub fn latest(&self) -> Option<&Reading> {
        self.readings.values().next_back()
    }

    /// The reading stored at an exact timestamp.
    pub fn get(&self, timestamp: DateTime<Utc>) -> Option<&Reading> {
        self.readings.get(&timestamp)
    }

    /// Iterate readings ascending by timestamp.
    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.values()
    }

    /// Ascending-by-timestamp snapshot of all readings.
    pub fn readings(&self) -> Vec<Reading> {
        self.readings.values().copied().collect()
    }
}

/// The state published to consumers on every accepted change.
///
/// Each published value is a complete, consistent snapshot: observers never
/// see a new current value paired with an old series. Horizon windows,
/// trends, and alert flags are derived on read from this state rather than
/// precomputed per horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedState {
    /// True until the first upstream notification has been accepted.
    pub loading: bool,
    /// Most recent reading; never regressed by late historical arrivals.
    pub current: Option<Reading>,
    /// Full historical series.
    pub series: SeriesStore,
    /// Online/offline judgment as of the last publish.
    pub liveness: LivenessState,
}

impl DerivedState {
    /// The initial state before any upstream data.
    pub fn initial() -> Self {
        Self {
            loading: true,
            current: None,
            series: SeriesStore::new(),
            liveness: LivenessState::offline(),
        }
    }

    /// Horizon-filtered view of the series, ascending by timestamp.
    pub fn window(&self, horizon: Horizon, now: DateTime<Utc>, live_count: usize) -> Vec<Reading> {
        derive::window::filter(&self.series.readings(), horizon, now, live_count)
    }

    /// Last-delta trend for a metric over the full series.
    pub fn trend(&self, metric: Metric) -> Trend {
        derive::trend::evaluate(&self.series.readings(), metric)
    }

    /// Out-of-range alert flag for the current value of a metric.
    ///
    /// `None` when there is no current reading or the metric is absent from
    /// it - no signal, not an alert.
    pub fn alert(&self, metric: Metric, config: &MetricConfig) -> Option<bool> {
        let value = self.current.as_ref().and_then(|r| r.value(metric));
        derive::range::is_abnormal(value, &config.normal_range)
    }

    /// Recompute liveness as of `now`, without waiting for the engine tick.
    pub fn liveness_at(&self, now: DateTime<Utc>, stale_after: Duration) -> LivenessState {
        derive::liveness::assess(now, self.current.as_ref().map(|r| r.timestamp), stale_after)
    }
}
