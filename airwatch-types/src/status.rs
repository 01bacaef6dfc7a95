//! Derived status types: liveness and trend.

use chrono::{DateTime, Utc};

/// Online/offline judgment derived from update recency.
///
/// This is a pure function of the clock and the last-seen timestamp, never
/// cached from ingest time alone: a station that silently stops reporting
/// goes offline as time passes, without any new data arriving.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LivenessState {
    /// Whether the gap since the last reading is within the staleness
    /// threshold.
    pub online: bool,
    /// Timestamp of the most recent reading, if any has ever arrived.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub last_seen: Option<DateTime<Utc>>,
}

impl LivenessState {
    /// State before any reading has arrived: offline by convention.
    pub fn offline() -> Self {
        Self {
            online: false,
            last_seen: None,
        }
    }
}

/// Direction of the last-delta trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TrendDirection {
    Rising,
    Falling,
    Flat,
}

impl TrendDirection {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            TrendDirection::Rising => "↑",
            TrendDirection::Falling => "↓",
            TrendDirection::Flat => "→",
        }
    }
}

/// Change between the two most recent readings of a metric.
///
/// This is deliberately a last-delta trend ("since last reading"), not a
/// regression over the window.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trend {
    pub direction: TrendDirection,
    /// Absolute size of the delta; 0 for flat or short series.
    pub magnitude: f64,
}

impl Trend {
    /// Neutral trend for series with fewer than two present points.
    pub fn flat() -> Self {
        Self {
            direction: TrendDirection::Flat,
            magnitude: 0.0,
        }
    }
}
