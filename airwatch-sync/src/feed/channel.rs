//! Channel-based feed source.
//!
//! Receives feed events via a tokio mpsc channel. This is useful for
//! integration tests and for bridging from any push-based client (a
//! realtime-database SDK callback, a message queue consumer, ...).

use std::sync::Arc;

use tokio::sync::mpsc;

use super::{FeedEvent, FeedReceiver};

/// Create an in-process feed pair.
///
/// Returns `(sender, receiver)`: the producer pushes [`FeedEvent`]s through
/// the sender and the receiver is handed to the engine.
///
/// # Example
///
/// ```
/// use airwatch_sync::feed;
///
/// let (tx, source) = feed::channel("station-1");
/// assert_eq!(source.description(), "channel: station-1");
/// # drop(tx);
/// ```
pub fn channel(description: &str) -> (mpsc::Sender<FeedEvent>, FeedReceiver) {
    let (tx, rx) = mpsc::channel(16);
    let receiver = FeedReceiver::new(
        rx,
        format!("channel: {}", description),
        Arc::default(),
    );
    (tx, receiver)
}
