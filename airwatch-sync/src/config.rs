//! Engine configuration.
//!
//! Everything here is fixed at engine construction and never mutated by
//! data flow. Defaults match the stock station profile; a settings file
//! (JSON/TOML/YAML, loaded via the `config` crate) can override any part.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use airwatch_types::{Metric, MetricConfig};

use crate::duration::parse_duration;

/// Per-metric descriptors for all tracked metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    pub temperature: MetricConfig,
    pub humidity: MetricConfig,
    pub air_quality: MetricConfig,
}

impl Default for MetricTable {
    fn default() -> Self {
        Self {
            temperature: MetricConfig::default_for(Metric::Temperature),
            humidity: MetricConfig::default_for(Metric::Humidity),
            air_quality: MetricConfig::default_for(Metric::AirQuality),
        }
    }
}

impl MetricTable {
    /// Descriptor for a metric.
    pub fn get(&self, metric: Metric) -> &MetricConfig {
        match metric {
            Metric::Temperature => &self.temperature,
            Metric::Humidity => &self.humidity,
            Metric::AirQuality => &self.air_quality,
        }
    }

    fn get_mut(&mut self, metric: Metric) -> &mut MetricConfig {
        match metric {
            Metric::Temperature => &mut self.temperature,
            Metric::Humidity => &mut self.humidity,
            Metric::AirQuality => &mut self.air_quality,
        }
    }
}

/// Static configuration for one engine instance.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Gap after which the station is considered offline.
    pub stale_after: Duration,
    /// Number of points kept by the live window.
    pub live_window: usize,
    /// How often liveness is re-evaluated without new data.
    pub tick_interval: Duration,
    /// Per-metric display and range descriptors.
    pub metrics: MetricTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(60),
            live_window: 20,
            tick_interval: Duration::from_secs(5),
            metrics: MetricTable::default(),
        }
    }
}

impl EngineConfig {
    /// Load a settings file and merge it over the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .with_context(|| format!("loading settings from {}", path.display()))?
            .try_deserialize()
            .context("invalid settings file")?;

        Self::default().merged(settings)
    }

    fn merged(mut self, settings: Settings) -> Result<Self> {
        if let Some(ref s) = settings.stale_after {
            self.stale_after = parse_duration(s)?;
        }
        if let Some(ref s) = settings.tick_interval {
            self.tick_interval = parse_duration(s)?;
        }
        if let Some(n) = settings.live_window {
            self.live_window = n;
        }

        for (key, overrides) in settings.metrics {
            let metric: Metric = key
                .parse()
                .map_err(|e: String| anyhow::anyhow!("in settings: {}", e))?;
            let entry = self.metrics.get_mut(metric);
            if let Some(label) = overrides.label {
                entry.label = label;
            }
            if let Some(unit) = overrides.unit {
                entry.unit = unit;
            }
            if let Some(min) = overrides.min {
                entry.normal_range.min = min;
            }
            if let Some(max) = overrides.max {
                entry.normal_range.max = max;
            }
        }

        Ok(self)
    }
}

/// Settings-file shape. Every field is optional; omissions keep defaults.
#[derive(Debug, Default, Deserialize)]
struct Settings {
    stale_after: Option<String>,
    tick_interval: Option<String>,
    live_window: Option<usize>,
    #[serde(default)]
    metrics: BTreeMap<String, MetricSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct MetricSettings {
    label: Option<String>,
    unit: Option<String>,
    min: Option<f64>,
    max: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_stock_profile() {
        let config = EngineConfig::default();
        assert_eq!(config.stale_after, Duration::from_secs(60));
        assert_eq!(config.live_window, 20);
        assert_eq!(config.metrics.get(Metric::Temperature).normal_range.min, 18.0);
        assert_eq!(config.metrics.get(Metric::Humidity).unit, "%");
    }

    #[test]
    fn merge_overrides_thresholds_and_ranges() {
        let settings = Settings {
            stale_after: Some("90s".to_string()),
            live_window: Some(50),
            metrics: [(
                "temperature".to_string(),
                MetricSettings {
                    min: Some(10.0),
                    max: Some(35.0),
                    ..Default::default()
                },
            )]
            .into_iter()
            .collect(),
            ..Default::default()
        };

        let config = EngineConfig::default().merged(settings).unwrap();
        assert_eq!(config.stale_after, Duration::from_secs(90));
        assert_eq!(config.live_window, 50);

        let temperature = config.metrics.get(Metric::Temperature);
        assert_eq!(temperature.normal_range.min, 10.0);
        assert_eq!(temperature.normal_range.max, 35.0);
        // Untouched fields keep defaults
        assert_eq!(temperature.unit, "°C");
        assert_eq!(config.metrics.get(Metric::Humidity).normal_range.min, 60.0);
    }

    #[test]
    fn merge_rejects_unknown_metric() {
        let settings = Settings {
            metrics: [("co2".to_string(), MetricSettings::default())]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        assert!(EngineConfig::default().merged(settings).is_err());
    }

    #[test]
    fn from_file_reads_json_settings() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        write!(
            file,
            r#"{{"stale_after": "2m", "metrics": {{"humidity": {{"min": 40.0}}}}}}"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.stale_after, Duration::from_secs(120));
        assert_eq!(config.metrics.get(Metric::Humidity).normal_range.min, 40.0);
    }

    #[test]
    fn from_file_missing_is_an_error() {
        assert!(EngineConfig::from_file(Path::new("/nonexistent/settings.json")).is_err());
    }
}
