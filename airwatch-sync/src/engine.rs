//! The sync engine: single-writer ingest loop and derived-state publisher.

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::derive::liveness;
use crate::feed::{FeedEvent, FeedReceiver, RawReading};
use crate::state::DerivedState;

/// Synchronizes in-memory state with an upstream feed and republishes a
/// consistent [`DerivedState`] after every accepted mutation.
///
/// One engine instance serves one dashboard session and exclusively owns
/// its series store and current snapshot; there is no process-wide shared
/// state. All events - feed notifications, the liveness tick, stop - are
/// processed one at a time on a single task, so publishes are strictly
/// ordered and never torn.
///
/// # Example
///
/// ```rust,no_run
/// use airwatch_sync::{feed, EngineConfig, SyncEngine};
///
/// #[tokio::main]
/// async fn main() {
///     let (tx, source) = feed::channel("station-1");
///     let handle = SyncEngine::new(EngineConfig::default()).start(source);
///
///     let mut states = handle.subscribe();
///     while states.changed().await.is_ok() {
///         let state = states.borrow().clone();
///         println!("online={} points={}", state.liveness.online, state.series.len());
///     }
///
///     handle.stop().await;
/// }
/// ```
#[derive(Debug, Default)]
pub struct SyncEngine {
    config: EngineConfig,
}

impl SyncEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start the engine against a feed.
    ///
    /// The initial `loading = true` state is observable immediately through
    /// the returned handle; after that, one state is published per accepted
    /// mutation, in the order mutations were accepted, plus one whenever a
    /// liveness tick flips the online flag.
    ///
    /// A closed feed does not clear state: the engine keeps ticking and the
    /// station simply drifts offline once the staleness threshold elapses.
    /// The engine cannot distinguish "sensor stopped reporting" from
    /// "network to the data source is down" and does not pretend to.
    pub fn start(self, mut feed: FeedReceiver) -> EngineHandle {
        let (state_tx, state_rx) = watch::channel(DerivedState::initial());
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let config = self.config;

        let task = tokio::spawn(async move {
            let mut task = EngineTask {
                config,
                state: DerivedState::initial(),
                tx: state_tx,
            };

            let mut tick = tokio::time::interval(task.config.tick_interval);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut feed_open = true;

            loop {
                tokio::select! {
                    event = feed.recv(), if feed_open => match event {
                        Some(event) => task.apply(event),
                        None => {
                            debug!("Feed closed ({}), state frozen", feed.description());
                            feed_open = false;
                        }
                    },
                    _ = tick.tick() => task.refresh_liveness(),
                    _ = stop_rx.changed() => break,
                }
            }
        });

        EngineHandle {
            state_rx,
            stop_tx,
            task,
        }
    }
}

/// The single-writer loop state. Lives on the spawned task; nothing else
/// can touch it.
struct EngineTask {
    config: EngineConfig,
    state: DerivedState,
    tx: watch::Sender<DerivedState>,
}

impl EngineTask {
    /// Apply one upstream notification, publishing if state changed.
    fn apply(&mut self, event: FeedEvent) {
        let mut accepted = false;
        let mut changed = false;

        match event {
            FeedEvent::Current(raw) => {
                self.ingest(raw, None, &mut accepted, &mut changed);
            }
            FeedEvent::Entry { key, reading } => {
                self.ingest(reading, Some(&key), &mut accepted, &mut changed);
            }
            FeedEvent::History(map) => {
                for (key, raw) in map {
                    self.ingest(raw, Some(&key), &mut accepted, &mut changed);
                }
            }
        }

        // The first accepted notification ends the loading phase even when
        // it repeats values we already hold.
        if accepted && self.state.loading {
            self.state.loading = false;
            changed = true;
        }

        if changed {
            self.state.liveness = liveness::assess(
                Utc::now(),
                self.state.current.as_ref().map(|r| r.timestamp),
                self.config.stale_after,
            );
            self.publish();
        }
    }

    /// Validate one raw record and fold it into the store.
    ///
    /// A rejected record leaves all state untouched; an accepted one
    /// updates the series and, unless it is a late historical arrival,
    /// the current snapshot.
    fn ingest(
        &mut self,
        raw: RawReading,
        key: Option<&str>,
        accepted: &mut bool,
        changed: &mut bool,
    ) {
        let reading = match raw.normalize(key) {
            Ok(reading) => reading,
            Err(e) => {
                warn!("Dropping malformed record: {}", e);
                return;
            }
        };

        *accepted = true;
        *changed |= self.state.series.insert(reading);

        let advances = match &self.state.current {
            Some(current) => reading.timestamp >= current.timestamp,
            None => true,
        };
        if advances && self.state.current != Some(reading) {
            self.state.current = Some(reading);
            *changed = true;
        }
    }

    /// Re-evaluate liveness from the clock alone, publishing on transition.
    ///
    /// This is what turns a silently stopped feed into an offline station:
    /// no new data is required for the flag to flip.
    fn refresh_liveness(&mut self) {
        let next = liveness::assess(
            Utc::now(),
            self.state.current.as_ref().map(|r| r.timestamp),
            self.config.stale_after,
        );
        if next.online != self.state.liveness.online {
            self.state.liveness = next;
            self.publish();
        }
    }

    fn publish(&self) {
        // Fails only when every receiver is gone; the handle holds one.
        let _ = self.tx.send(self.state.clone());
    }
}

/// Handle to a running engine.
///
/// Dropping the handle stops the engine on its next loop iteration; use
/// [`stop`] for the stronger guarantee that no publish happens after the
/// call returns.
///
/// [`stop`]: EngineHandle::stop
#[derive(Debug)]
pub struct EngineHandle {
    state_rx: watch::Receiver<DerivedState>,
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl EngineHandle {
    /// Subscribe to derived-state publishes.
    ///
    /// Observers see states in publish order with latest-wins coalescing;
    /// every observed value is a complete, consistent snapshot.
    pub fn subscribe(&self) -> watch::Receiver<DerivedState> {
        self.state_rx.clone()
    }

    /// The most recently published state.
    pub fn state(&self) -> DerivedState {
        self.state_rx.borrow().clone()
    }

    /// Stop the engine.
    ///
    /// Consuming the handle makes stopping idempotent by construction. A
    /// publish delivered before the stop is still observable by
    /// subscribers, but once this returns the engine task has exited and
    /// no further publish will be initiated.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.task.await;
    }
}
