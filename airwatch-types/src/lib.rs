//! # airwatch-types
//!
//! Core types for environmental sensor telemetry. This crate defines the
//! schema shared between feed producers, the airwatch sync engine, and the
//! rendering layers that consume derived state.
//!
//! ## Design Goals
//!
//! - **Zero required serialization**: core types work without serde
//! - **Optional serialization**: enable the `serde` feature as needed
//! - **Absence is explicit**: a sensor missing from a reading is `None`,
//!   never coerced to zero
//! - **Source-agnostic**: works with any keyed real-time feed that yields
//!   timestamped readings
//!
//! ## Features
//!
//! - `serde`: JSON/etc. serialization via serde (also enables chrono's)
//!
//! ## Example
//!
//! ```rust
//! use airwatch_types::{Metric, MetricConfig, Reading};
//! use chrono::Utc;
//!
//! let reading = Reading::new(Utc::now())
//!     .with_temperature(24.5)
//!     .with_humidity(61.0);
//!
//! assert_eq!(reading.value(Metric::Temperature), Some(24.5));
//! assert_eq!(reading.value(Metric::AirQuality), None);
//!
//! let config = MetricConfig::default_for(Metric::Temperature);
//! assert_eq!(config.unit, "°C");
//! ```

mod horizon;
mod metric;
mod reading;
mod status;

pub use horizon::*;
pub use metric::*;
pub use reading::*;
pub use status::*;
