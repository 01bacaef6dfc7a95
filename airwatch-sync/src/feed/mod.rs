//! Upstream feed abstraction: wire shapes, validation, and feed sources.
//!
//! The upstream store is an opaque keyed real-time collection with a
//! "current" pointer and a "history" mapping from timestamp key to reading.
//! This module expresses its notifications as [`FeedEvent`]s and provides
//! sources for receiving them from different backends - in-process channels,
//! newline-delimited JSON streams, or polled snapshot files.
//!
//! Reconnection and backoff belong to the feed client, not here: sources
//! only surface "value changed" events, and a closed source simply ends the
//! event stream.

mod channel;
mod file;
mod stream;

pub use channel::channel;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

use airwatch_types::Reading;

/// A reading as it appears on the wire, before validation.
///
/// Field aliases match the upstream JSON: `airQuality` for `air_quality`
/// and `last_time` for the current-pointer timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,

    #[serde(default, alias = "airQuality", skip_serializing_if = "Option::is_none")]
    pub air_quality: Option<f64>,

    /// Timestamp of the observation. History entries may omit it; their map
    /// key carries the timestamp instead.
    #[serde(default, alias = "last_time", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<RawTimestamp>,
}

/// Wire timestamp: an RFC 3339 string or epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Text(String),
    Millis(i64),
}

/// One notification from the upstream store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedEvent {
    /// The "current" pointer changed.
    Current(RawReading),
    /// The full history collection, keyed by timestamp.
    History(BTreeMap<String, RawReading>),
    /// A single history entry was added or overwritten.
    Entry { key: String, reading: RawReading },
}

/// Reasons a record is rejected during normalization.
///
/// Rejection drops only the offending record; prior engine state is
/// retained.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record has no timestamp")]
    MissingTimestamp,

    #[error("unparseable timestamp: {0}")]
    BadTimestamp(String),
}

impl RawReading {
    /// Validate and normalize into a [`Reading`].
    ///
    /// `fallback_key` is the history map key, consulted when the record
    /// itself carries no timestamp field. A record whose metric fields are
    /// all absent is still ingestable - it is a no-signal observation, not
    /// an error.
    pub fn normalize(&self, fallback_key: Option<&str>) -> Result<Reading, RecordError> {
        let timestamp = match &self.timestamp {
            Some(RawTimestamp::Text(s)) => parse_timestamp(s)?,
            Some(RawTimestamp::Millis(ms)) => timestamp_from_millis(*ms)?,
            None => {
                let key = fallback_key.ok_or(RecordError::MissingTimestamp)?;
                parse_timestamp(key)?
            }
        };

        Ok(Reading {
            timestamp,
            temperature: self.temperature,
            humidity: self.humidity,
            air_quality: self.air_quality,
        })
    }
}

/// Parse a wire timestamp string: RFC 3339 first, then epoch milliseconds.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, RecordError> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(ms) = s.parse::<i64>() {
        return timestamp_from_millis(ms);
    }

    Err(RecordError::BadTimestamp(s.to_string()))
}

fn timestamp_from_millis(ms: i64) -> Result<DateTime<Utc>, RecordError> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| RecordError::BadTimestamp(ms.to_string()))
}

/// Receiving end of an upstream feed.
///
/// Every source produces one of these; the engine consumes it. When the
/// source goes away (connection closed, sender dropped), [`recv`] returns
/// `None` and the engine freezes its state - liveness then degrades
/// naturally as the staleness threshold elapses.
///
/// [`recv`]: FeedReceiver::recv
#[derive(Debug)]
pub struct FeedReceiver {
    receiver: mpsc::Receiver<FeedEvent>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
}

impl FeedReceiver {
    pub(crate) fn new(
        receiver: mpsc::Receiver<FeedEvent>,
        description: String,
        last_error: Arc<Mutex<Option<String>>>,
    ) -> Self {
        Self {
            receiver,
            description,
            last_error,
        }
    }

    /// Receive the next event; `None` once the source is gone.
    pub async fn recv(&mut self) -> Option<FeedEvent> {
        self.receiver.recv().await
    }

    /// Human-readable description of the source, for status display.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The last transport or parse error recorded by the source, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_rfc3339_timestamp() {
        let raw = RawReading {
            temperature: Some(25.0),
            timestamp: Some(RawTimestamp::Text("2026-08-01T12:00:00Z".to_string())),
            ..Default::default()
        };

        let reading = raw.normalize(None).unwrap();
        assert_eq!(reading.temperature, Some(25.0));
        assert_eq!(reading.timestamp.to_rfc3339(), "2026-08-01T12:00:00+00:00");
    }

    #[test]
    fn normalize_offset_timestamp_to_utc() {
        let raw = RawReading {
            timestamp: Some(RawTimestamp::Text("2026-08-01T14:00:00+02:00".to_string())),
            ..Default::default()
        };

        let reading = raw.normalize(None).unwrap();
        assert_eq!(reading.timestamp.to_rfc3339(), "2026-08-01T12:00:00+00:00");
    }

    #[test]
    fn normalize_epoch_millis() {
        let raw = RawReading {
            humidity: Some(61.5),
            timestamp: Some(RawTimestamp::Millis(1_700_000_000_000)),
            ..Default::default()
        };

        let reading = raw.normalize(None).unwrap();
        assert_eq!(reading.timestamp.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn normalize_falls_back_to_map_key() {
        let raw = RawReading {
            air_quality: Some(80.0),
            ..Default::default()
        };

        let reading = raw.normalize(Some("2026-08-01T12:00:00Z")).unwrap();
        assert_eq!(reading.timestamp.to_rfc3339(), "2026-08-01T12:00:00+00:00");

        // Numeric string keys work too
        let reading = raw.normalize(Some("1700000000000")).unwrap();
        assert_eq!(reading.timestamp.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn normalize_rejects_malformed_timestamp() {
        let raw = RawReading {
            timestamp: Some(RawTimestamp::Text("not a time".to_string())),
            ..Default::default()
        };
        assert!(matches!(
            raw.normalize(None),
            Err(RecordError::BadTimestamp(_))
        ));

        let raw = RawReading::default();
        assert!(matches!(
            raw.normalize(None),
            Err(RecordError::MissingTimestamp)
        ));
        assert!(matches!(
            raw.normalize(Some("garbage")),
            Err(RecordError::BadTimestamp(_))
        ));
    }

    #[test]
    fn normalize_accepts_all_metrics_absent() {
        let raw = RawReading {
            timestamp: Some(RawTimestamp::Millis(0)),
            ..Default::default()
        };

        let reading = raw.normalize(None).unwrap();
        assert!(reading.is_empty());
    }

    #[test]
    fn deserialize_upstream_aliases() {
        let json = r#"{"temperature": 24.5, "airQuality": 78.0, "last_time": "2026-08-01T12:00:00Z"}"#;
        let raw: RawReading = serde_json::from_str(json).unwrap();

        assert_eq!(raw.temperature, Some(24.5));
        assert_eq!(raw.air_quality, Some(78.0));
        assert!(matches!(raw.timestamp, Some(RawTimestamp::Text(_))));
    }

    #[test]
    fn deserialize_feed_events() {
        let current: FeedEvent =
            serde_json::from_str(r#"{"current": {"temperature": 22.0, "timestamp": 1700000000000}}"#)
                .unwrap();
        assert!(matches!(current, FeedEvent::Current(_)));

        let history: FeedEvent = serde_json::from_str(
            r#"{"history": {"2026-08-01T12:00:00Z": {"humidity": 65.0}}}"#,
        )
        .unwrap();
        match history {
            FeedEvent::History(map) => assert_eq!(map.len(), 1),
            other => panic!("expected history event, got {:?}", other),
        }

        let entry: FeedEvent = serde_json::from_str(
            r#"{"entry": {"key": "2026-08-01T12:00:00Z", "reading": {"temperature": 21.0}}}"#,
        )
        .unwrap();
        assert!(matches!(entry, FeedEvent::Entry { .. }));
    }
}
