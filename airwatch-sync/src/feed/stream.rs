//! Stream-based feed source.
//!
//! Receives feed events from an async byte stream as newline-delimited
//! JSON. This is the transport for network sources like TCP connections.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use super::{FeedEvent, FeedReceiver};

impl FeedReceiver {
    /// Spawn a background task that reads newline-delimited JSON
    /// [`FeedEvent`]s from the given async reader.
    ///
    /// Malformed lines are skipped with the error recorded in
    /// [`last_error`]; the stream keeps going. EOF or a read error ends the
    /// feed.
    ///
    /// [`last_error`]: FeedReceiver::last_error
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::Cursor;
    /// use airwatch_sync::feed::FeedReceiver;
    ///
    /// # tokio_test::block_on(async {
    /// let data = b"{\"current\": {\"temperature\": 22.0, \"timestamp\": 1700000000000}}\n";
    /// let source = FeedReceiver::from_reader(Cursor::new(data.to_vec()), "example");
    /// # });
    /// ```
    pub fn from_reader<R>(reader: R, description: &str) -> FeedReceiver
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(16);
        let last_error: Arc<Mutex<Option<String>>> = Arc::default();
        let error_slot = last_error.clone();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        *error_slot.lock() = Some("Connection closed".to_string());
                        break;
                    }
                    Ok(_) => match serde_json::from_str::<FeedEvent>(line.trim()) {
                        Ok(event) => {
                            *error_slot.lock() = None;
                            if tx.send(event).await.is_err() {
                                // Receiver dropped
                                break;
                            }
                        }
                        Err(e) => {
                            debug!("Skipping malformed feed line: {}", e);
                            *error_slot.lock() = Some(format!("Parse error: {}", e));
                        }
                    },
                    Err(e) => {
                        *error_slot.lock() = Some(format!("Read error: {}", e));
                        break;
                    }
                }
            }
        });

        FeedReceiver::new(rx, format!("stream: {}", description), last_error)
    }

    /// Feed events from raw JSON byte payloads.
    ///
    /// This is useful when another component (a message bus subscriber, a
    /// websocket client) already delivers complete JSON messages and you
    /// want to push them without an `AsyncRead`.
    pub fn from_bytes_channel(mut rx: mpsc::Receiver<Vec<u8>>, description: &str) -> FeedReceiver {
        let (tx, event_rx) = mpsc::channel(16);
        let last_error: Arc<Mutex<Option<String>>> = Arc::default();
        let error_slot = last_error.clone();

        tokio::spawn(async move {
            while let Some(bytes) = rx.recv().await {
                match serde_json::from_slice::<FeedEvent>(&bytes) {
                    Ok(event) => {
                        *error_slot.lock() = None;
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        *error_slot.lock() = Some(format!("Parse error: {}", e));
                    }
                }
            }
        });

        FeedReceiver::new(event_rx, format!("stream: {}", description), last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_line() -> &'static str {
        r#"{"current": {"temperature": 24.0, "humidity": 62.0, "timestamp": 1700000000000}}"#
    }

    #[tokio::test]
    async fn from_reader_parses_lines() {
        let data = format!("{}\n{}\n", sample_line(), sample_line());
        let mut source = FeedReceiver::from_reader(Cursor::new(data), "test");

        assert!(matches!(source.recv().await, Some(FeedEvent::Current(_))));
        assert!(matches!(source.recv().await, Some(FeedEvent::Current(_))));

        // EOF ends the feed
        assert!(source.recv().await.is_none());
    }

    #[tokio::test]
    async fn from_reader_skips_malformed_lines() {
        let data = format!("not valid json\n{}\n", sample_line());
        let mut source = FeedReceiver::from_reader(Cursor::new(data), "test");

        // The valid line still comes through
        assert!(matches!(source.recv().await, Some(FeedEvent::Current(_))));
        assert!(source.recv().await.is_none());
    }

    #[tokio::test]
    async fn from_reader_description() {
        let source = FeedReceiver::from_reader(Cursor::new(""), "tcp://localhost:9090");
        assert_eq!(source.description(), "stream: tcp://localhost:9090");
    }

    #[tokio::test]
    async fn from_reader_records_eof_error() {
        let mut source = FeedReceiver::from_reader(Cursor::new(""), "test");
        assert!(source.recv().await.is_none());
        assert_eq!(source.last_error().as_deref(), Some("Connection closed"));
    }

    #[tokio::test]
    async fn from_bytes_channel_parses_payloads() {
        let (tx, rx) = mpsc::channel::<Vec<u8>>(16);
        let mut source = FeedReceiver::from_bytes_channel(rx, "bridge");

        tx.send(sample_line().as_bytes().to_vec()).await.unwrap();
        assert!(matches!(source.recv().await, Some(FeedEvent::Current(_))));

        drop(tx);
        assert!(source.recv().await.is_none());
    }
}
