//! Metric identities and their configured normal operating ranges.

use core::fmt;
use core::str::FromStr;

/// The sensor metrics tracked by a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Metric {
    Temperature,
    Humidity,
    AirQuality,
}

impl Metric {
    /// All metrics, in display order.
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Humidity, Metric::AirQuality];

    /// Wire/config key for this metric.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::AirQuality => "air_quality",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "temperature" => Ok(Metric::Temperature),
            "humidity" => Ok(Metric::Humidity),
            "air_quality" | "airquality" => Ok(Metric::AirQuality),
            other => Err(format!("unknown metric: {}", other)),
        }
    }
}

/// Values at or above this ceiling mark a range as one-sided.
///
/// Percentage metrics have no meaningful upper alert bound; their configured
/// max of 100 is a sentinel that disables the upper check rather than a
/// threshold to alert on.
pub const UNBOUNDED_CEILING: f64 = 100.0;

/// Normal operating range for a metric.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalRange {
    /// Values below this are always out of range.
    pub min: f64,
    /// Values above this are out of range only when the range has an
    /// effective ceiling (see [`UNBOUNDED_CEILING`]).
    pub max: f64,
}

impl NormalRange {
    /// Create a range.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether the upper bound is a real threshold rather than the
    /// no-ceiling sentinel.
    pub fn has_ceiling(&self) -> bool {
        self.max < UNBOUNDED_CEILING
    }
}

/// Static per-metric descriptor: display label, unit, and normal range.
///
/// Defined once at engine construction and never mutated by data flow.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricConfig {
    /// Human-readable name ("Temperature").
    pub label: String,
    /// Display unit ("°C", "%").
    pub unit: String,
    /// Normal operating range for alerting.
    pub normal_range: NormalRange,
}

impl MetricConfig {
    /// The stock descriptor for a metric.
    pub fn default_for(metric: Metric) -> Self {
        match metric {
            Metric::Temperature => Self {
                label: "Temperature".to_string(),
                unit: "°C".to_string(),
                normal_range: NormalRange::new(18.0, 30.0),
            },
            Metric::Humidity => Self {
                label: "Humidity".to_string(),
                unit: "%".to_string(),
                normal_range: NormalRange::new(60.0, 100.0),
            },
            Metric::AirQuality => Self {
                label: "Air Quality".to_string(),
                unit: "%".to_string(),
                normal_range: NormalRange::new(60.0, 100.0),
            },
        }
    }
}
