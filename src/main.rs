//! Auction feed client - main entry point.
//!
//! Connects to the live feed, subscribes to one sale channel, and logs
//! every classified event until the stream ends or Ctrl+C.

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use auction_feed::events::{EventClassifier, FeedSchema};
use auction_feed::utils::{init_telemetry, init_telemetry_json, FeedEnvironment};
use auction_feed::{FeedWebSocket, LiveEvent, SaleWatcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file found or error loading it: {}", e);
    }

    let environment = FeedEnvironment::from_env();
    if environment.json_logs {
        init_telemetry_json();
    } else {
        init_telemetry();
    }

    if environment.is_test_environment() {
        warn!("AUCTION_FEED_TEST is set - expecting a test/staging feed");
    }

    let url = std::env::var("AUCTION_FEED_URL")
        .context("AUCTION_FEED_URL must point at the feed endpoint")?;
    let sale_id = std::env::var("AUCTION_SALE_ID")
        .context("AUCTION_SALE_ID must name the sale channel to subscribe to")?;

    let schema = load_schema()?;
    info!(
        "[{}] Feed schema: {} recognized tag(s)",
        sale_id,
        schema.tags.len()
    );

    let (raw_tx, raw_rx) = mpsc::channel(1000);
    let (event_tx, mut event_rx) = mpsc::channel(1000);

    let mut socket = FeedWebSocket::new(url, sale_id.clone(), raw_tx);
    let socket_task = tokio::spawn(async move {
        socket.connect().await?;
        socket.subscribe().await?;
        socket.run_until_close().await
    });

    let watcher = SaleWatcher::new(EventClassifier::new(schema), raw_rx, event_tx);
    let watcher_task = tokio::spawn(watcher.run());

    info!("[{}] Streaming events. Press Ctrl+C to stop.", sale_id);

    loop {
        tokio::select! {
            maybe_event = event_rx.recv() => {
                match maybe_event {
                    Some(event) => log_event(&sale_id, &event),
                    None => {
                        info!("[{}] Event stream ended", sale_id);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("[{}] Shutdown signal received", sale_id);
                break;
            }
        }
    }

    socket_task.abort();
    match socket_task.await {
        Ok(Ok(())) => info!("[{}] Feed closed cleanly", sale_id),
        Ok(Err(e)) => error!("[{}] Feed transport failed: {}", sale_id, e),
        Err(e) if e.is_cancelled() => info!("[{}] Feed socket cancelled", sale_id),
        Err(e) => error!("[{}] Feed socket task panicked: {:?}", sale_id, e),
    }

    // The watcher drains and exits once the raw channel closes.
    let _ = watcher_task.await;

    info!("[{}] Shut down", sale_id);
    Ok(())
}

/// Loads the feed schema from AUCTION_FEED_SCHEMA (a path to a JSON
/// file) or falls back to the built-in feed contract.
fn load_schema() -> anyhow::Result<FeedSchema> {
    match std::env::var("AUCTION_FEED_SCHEMA") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading feed schema {}", path))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing feed schema {}", path))
        }
        Err(_) => Ok(FeedSchema::default()),
    }
}

fn log_event(sale_id: &str, event: &LiveEvent) {
    match event {
        LiveEvent::Bid(bid) => info!(
            "[{}] bid {} for {} cents (source: {:?}, confirmed: {})",
            sale_id,
            bid.event_id(),
            bid.amount_cents(),
            bid.source(),
            bid.is_confirmed()
        ),
        other => info!(
            "[{}] {} {} (tag: {})",
            sale_id,
            other.classification(),
            other.event_id(),
            other.raw_type()
        ),
    }
}
