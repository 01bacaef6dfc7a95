//! Example: Driving the engine from a channel
//!
//! This example demonstrates how to integrate airwatch into your own
//! application by pushing feed events through a channel.
//!
//! This is useful when you want to:
//! - Bridge from a realtime-database SDK callback
//! - Generate synthetic data for testing
//! - Feed the engine from any async source
//!
//! # Usage
//!
//! ```bash
//! cargo run --example channel_feed
//! ```

use std::time::Duration;

use chrono::Utc;

use airwatch_sync::feed::{FeedEvent, RawReading, RawTimestamp};
use airwatch_sync::{feed, EngineConfig, Metric, SyncEngine};

#[tokio::main]
async fn main() {
    println!("Channel feed example");
    println!("Generating synthetic sensor readings...\n");

    let config = EngineConfig::default();
    let (tx, source) = feed::channel("synthetic-data");
    let handle = SyncEngine::new(config.clone()).start(source);

    // Produce one reading per second, drifting sinusoidally. Every fifth
    // reading drops the air quality sensor to show absence handling.
    tokio::spawn(async move {
        let mut step = 0u64;

        loop {
            step += 1;
            let phase = (step as f64 * 0.3).sin();

            let raw = RawReading {
                temperature: Some(24.0 + 3.0 * phase),
                humidity: Some(65.0 + 5.0 * phase),
                air_quality: if step % 5 == 0 {
                    None
                } else {
                    Some(82.0 - 2.0 * phase)
                },
                timestamp: Some(RawTimestamp::Millis(Utc::now().timestamp_millis())),
            };

            if tx.send(FeedEvent::Current(raw)).await.is_err() {
                break; // Engine stopped
            }

            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    });

    println!("Receiving derived state (press Ctrl+C to stop):\n");

    let mut states = handle.subscribe();
    while states.changed().await.is_ok() {
        let state = states.borrow().clone();
        if state.loading {
            continue;
        }

        println!(
            "{} ({} points)",
            if state.liveness.online { "online" } else { "offline" },
            state.series.len()
        );

        for metric in Metric::ALL {
            let descriptor = config.metrics.get(metric);
            match state.current.as_ref().and_then(|r| r.value(metric)) {
                Some(value) => {
                    let trend = state.trend(metric);
                    println!(
                        "  {}: {:.1}{} {} {:.1}{}",
                        descriptor.label,
                        value,
                        descriptor.unit,
                        trend.direction.symbol(),
                        trend.magnitude,
                        if state.alert(metric, descriptor) == Some(true) {
                            "  ALERT"
                        } else {
                            ""
                        }
                    );
                }
                None => println!("  {}: no signal", descriptor.label),
            }
        }
        println!();
    }
}
