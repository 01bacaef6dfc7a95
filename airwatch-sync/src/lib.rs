//! # airwatch-sync
//!
//! Sync and derivation engine for live environmental sensor dashboards.
//!
//! This crate keeps an in-memory mirror of a remote real-time sensor feed
//! and derives everything a dashboard needs from it: the current values, an
//! online/offline judgment based on update recency, horizon-filtered
//! history windows, per-metric trends, and out-of-range alert flags.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        upstream feed                           │
//! │       channel | NDJSON stream reader | polled snapshot file    │
//! │                           │ FeedEvent                          │
//! │                           ▼                                    │
//! │  ┌──────────┐   ┌─────────────────┐    ┌────────────────────┐  │
//! │  │  feed    │──▶│     engine      │───▶│  DerivedState      │  │
//! │  │ (ingest) │   │ (single writer) │    │  (watch channel)   │  │
//! │  └──────────┘   └────────┬────────┘    └─────────┬──────────┘  │
//! │                          │ liveness tick         │ consumers   │
//! │                          ▼                       ▼             │
//! │                 ┌──────────────────────────────────────┐       │
//! │                 │ derive: window | trend | range |     │       │
//! │                 │         liveness (pure, on read)     │       │
//! │                 └──────────────────────────────────────┘       │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`feed`]**: wire shapes and feed sources (in-process channel,
//!   newline-delimited JSON stream, polled snapshot file)
//! - **[`engine`]**: the [`SyncEngine`] event loop - validates records,
//!   owns the series store, republishes consistent state on every change
//! - **[`state`]**: the [`SeriesStore`] and the published [`DerivedState`]
//! - **[`derive`]**: pure derivation components computed on read
//! - **[`config`]**: static engine configuration and settings files
//!
//! ## Usage
//!
//! ```rust,no_run
//! use airwatch_sync::{feed, EngineConfig, Metric, SyncEngine};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tx, source) = feed::channel("station-1");
//!     let config = EngineConfig::default();
//!     let handle = SyncEngine::new(config.clone()).start(source);
//!
//!     let mut states = handle.subscribe();
//!     while states.changed().await.is_ok() {
//!         let state = states.borrow().clone();
//!         if let Some(current) = &state.current {
//!             let trend = state.trend(Metric::Temperature);
//!             println!("{:?} {}", current.temperature, trend.direction.symbol());
//!         }
//!     }
//! }
//! ```
//!
//! Failure is never a distinct state across the boundary: consumers observe
//! `loading = true` (no data yet) or a stale `last_seen` (offline). The
//! engine tolerates arbitrarily long feed gaps and never clears state on
//! disconnect.

pub mod config;
pub mod derive;
pub mod duration;
pub mod engine;
pub mod feed;
pub mod state;

// Re-export the main types for convenience
pub use config::{EngineConfig, MetricTable};
pub use engine::{EngineHandle, SyncEngine};
pub use feed::{FeedEvent, FeedReceiver, RawReading, RawTimestamp, RecordError};
pub use state::{DerivedState, SeriesStore};

// Re-export the schema crate
pub use airwatch_types::{
    Horizon, LivenessState, Metric, MetricConfig, NormalRange, Reading, Trend, TrendDirection,
};
