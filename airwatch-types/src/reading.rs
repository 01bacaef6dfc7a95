//! Reading - one timestamped sensor observation.

use chrono::{DateTime, Utc};

use crate::Metric;

/// A single timestamped observation from the sensor station.
///
/// Each metric field is optional because a sensor may be absent from any
/// given reading. Absence means "no signal" and must be propagated as such;
/// consumers null-check per metric rather than assuming zero.
///
/// Readings are immutable once stored; the timestamp is the source of truth
/// for ordering and staleness.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reading {
    /// When the station captured this observation.
    pub timestamp: DateTime<Utc>,

    /// Temperature in the configured unit (°C by default).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub temperature: Option<f64>,

    /// Relative humidity in percent.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub humidity: Option<f64>,

    /// Air quality/purity in percent.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub air_quality: Option<f64>,
}

impl Reading {
    /// Create a reading with no metric values (a "no-signal" observation).
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            temperature: None,
            humidity: None,
            air_quality: None,
        }
    }

    /// Set the temperature value.
    pub fn with_temperature(mut self, value: f64) -> Self {
        self.temperature = Some(value);
        self
    }

    /// Set the humidity value.
    pub fn with_humidity(mut self, value: f64) -> Self {
        self.humidity = Some(value);
        self
    }

    /// Set the air quality value.
    pub fn with_air_quality(mut self, value: f64) -> Self {
        self.air_quality = Some(value);
        self
    }

    /// Get the value for a metric, if the sensor reported one.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::AirQuality => self.air_quality,
        }
    }

    /// True if no sensor reported a value in this reading.
    pub fn is_empty(&self) -> bool {
        Metric::ALL.iter().all(|m| self.value(*m).is_none())
    }
}
