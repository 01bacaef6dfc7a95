//! File-based feed source.
//!
//! Polls a JSON snapshot file and emits feed events when it changes. This
//! is the replay/demo mode: a producer (or a human) writes snapshots of the
//! upstream store to a file, and this source tails it by modification time.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;
use serde::Deserialize;
use tokio::sync::mpsc;

use super::{FeedEvent, FeedReceiver, RawReading};

/// On-disk snapshot shape: the upstream store's two paths side by side.
#[derive(Debug, Default, Deserialize)]
struct FileSnapshot {
    #[serde(default)]
    current: Option<RawReading>,
    #[serde(default)]
    history: BTreeMap<String, RawReading>,
}

impl FeedReceiver {
    /// Poll a JSON snapshot file and emit events when its mtime changes.
    ///
    /// Each change emits the full history collection followed by the
    /// current pointer. Read and parse failures are recorded in
    /// [`last_error`] and retried on the next poll; a missing file is not
    /// fatal (the feed waits for it to appear).
    ///
    /// Note: filesystems with coarse mtime resolution may delay change
    /// detection by up to one timestamp granule.
    ///
    /// [`last_error`]: FeedReceiver::last_error
    pub fn from_file(path: impl AsRef<Path>, poll_interval: Duration) -> FeedReceiver {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        let (tx, rx) = mpsc::channel(16);
        let last_error: Arc<Mutex<Option<String>>> = Arc::default();
        let error_slot = last_error.clone();

        tokio::spawn(async move {
            let mut last_modified: Option<SystemTime> = None;
            let mut tick = tokio::time::interval(poll_interval);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tick.tick().await;

                let modified = match tokio::fs::metadata(&path).await {
                    Ok(meta) => meta.modified().ok(),
                    Err(e) => {
                        *error_slot.lock() = Some(format!("Read error: {}", e));
                        continue;
                    }
                };

                let file_changed = match (&last_modified, &modified) {
                    (None, _) => true,
                    (Some(_), None) => false,
                    (Some(last), Some(current)) => current > last,
                };
                if !file_changed {
                    continue;
                }

                let content = match tokio::fs::read_to_string(&path).await {
                    Ok(content) => content,
                    Err(e) => {
                        *error_slot.lock() = Some(format!("Read error: {}", e));
                        continue;
                    }
                };

                match serde_json::from_str::<FileSnapshot>(&content) {
                    Ok(snapshot) => {
                        *error_slot.lock() = None;
                        last_modified = modified;

                        if !snapshot.history.is_empty()
                            && tx.send(FeedEvent::History(snapshot.history)).await.is_err()
                        {
                            return;
                        }
                        if let Some(current) = snapshot.current {
                            if tx.send(FeedEvent::Current(current)).await.is_err() {
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        *error_slot.lock() = Some(format!("Parse error: {}", e));
                    }
                }
            }
        });

        FeedReceiver::new(rx, description, last_error)
    }
}
