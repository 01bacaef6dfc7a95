use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use airwatch_sync::duration::{format_duration, parse_duration};
use airwatch_sync::{DerivedState, EngineConfig, FeedReceiver, Metric, SyncEngine};

#[derive(Parser, Debug)]
#[command(name = "airwatch")]
#[command(about = "Sync engine for live environmental sensor dashboards")]
struct Args {
    /// Path to a JSON snapshot file ({"current": ..., "history": ...})
    #[arg(short, long, default_value = "sensors.json", conflicts_with = "connect")]
    file: PathBuf,

    /// Connect to a TCP endpoint for newline-delimited feed events (host:port)
    #[arg(short, long)]
    connect: Option<String>,

    /// Settings file with metric ranges and thresholds
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Staleness threshold, e.g. "60s", "2m"
    #[arg(long)]
    stale_after: Option<String>,

    /// Liveness re-check interval, e.g. "5s"
    #[arg(long)]
    tick: Option<String>,

    /// Number of points kept by the live window
    #[arg(long)]
    live_window: Option<usize>,

    /// File poll interval in seconds (only used with --file)
    #[arg(short, long, default_value = "1")]
    refresh: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = match &args.settings {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(ref s) = args.stale_after {
        config.stale_after = parse_duration(s)?;
    }
    if let Some(ref s) = args.tick {
        config.tick_interval = parse_duration(s)?;
    }
    if let Some(n) = args.live_window {
        config.live_window = n;
    }

    let source = match &args.connect {
        Some(addr) => {
            let stream = tokio::net::TcpStream::connect(addr)
                .await
                .with_context(|| format!("connecting to {}", addr))?;
            info!("Connected to {}", addr);
            FeedReceiver::from_reader(stream, addr)
        }
        None => FeedReceiver::from_file(&args.file, Duration::from_secs(args.refresh)),
    };

    info!("Watching {}", source.description());
    let handle = SyncEngine::new(config.clone()).start(source);
    let mut states = handle.subscribe();

    loop {
        tokio::select! {
            result = states.changed() => {
                if result.is_err() {
                    break;
                }
                let state = states.borrow().clone();
                println!("{}", render_status(&state, &config));
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.stop().await;
    Ok(())
}

/// One status line per published state.
fn render_status(state: &DerivedState, config: &EngineConfig) -> String {
    if state.loading {
        return "waiting for data...".to_string();
    }

    let mut line = String::new();
    let _ = write!(
        line,
        "[{}]",
        if state.liveness.online { "online " } else { "offline" }
    );

    for metric in Metric::ALL {
        let descriptor = config.metrics.get(metric);
        let value = state.current.as_ref().and_then(|r| r.value(metric));
        match value {
            Some(value) => {
                let trend = state.trend(metric);
                let _ = write!(
                    line,
                    "  {} {:.1}{} {}{:.1}",
                    descriptor.label,
                    value,
                    descriptor.unit,
                    trend.direction.symbol(),
                    trend.magnitude
                );
                if state.alert(metric, descriptor) == Some(true) {
                    let _ = write!(line, " ALERT");
                }
            }
            None => {
                let _ = write!(line, "  {} --", descriptor.label);
            }
        }
    }

    if let Some(last_seen) = state.liveness.last_seen {
        let age = chrono::Utc::now().signed_duration_since(last_seen);
        if let Ok(age) = age.to_std() {
            let _ = write!(line, "  (last seen {} ago)", format_duration(age));
        }
    }

    let _ = write!(line, "  {} points", state.series.len());
    line
}
