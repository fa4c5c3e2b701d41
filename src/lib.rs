//! Live-auction feed client.
//!
//! This crate decodes a real-time stream of auction-lot state messages
//! (lot opened, bid placed, warning issued, final call, lot closed) into
//! strongly-typed events.
//!
//! # Architecture
//!
//! - **Event-driven**: every raw feed frame is normalized into a typed
//!   [`LiveEvent`] before downstream code sees it
//! - **Total classification**: unrecognized wire tags decode to
//!   `Unknown` instead of failing, so feed-schema additions never crash
//!   existing clients
//! - **Fail-soft decoding**: a malformed message is dropped with a log
//!   line; it never aborts the stream
//! - **Configurable schema**: tag spellings and wire key names are data
//!   ([`FeedSchema`]), owned by the feed contract, not literals in decode
//!   logic
//!
//! # Usage
//!
//! ```no_run
//! use auction_feed::events::{EventClassifier, FeedSchema};
//! use auction_feed::{FeedWebSocket, SaleWatcher};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (raw_tx, raw_rx) = mpsc::channel(1000);
//!     let (event_tx, mut event_rx) = mpsc::channel(1000);
//!
//!     let mut socket = FeedWebSocket::new(
//!         "wss://feed.example.com/live".to_string(),
//!         "evening-sale-42".to_string(),
//!         raw_tx,
//!     );
//!     let watcher = SaleWatcher::new(
//!         EventClassifier::new(FeedSchema::default()),
//!         raw_rx,
//!         event_tx,
//!     );
//!
//!     tokio::spawn(watcher.run());
//!     tokio::spawn(async move {
//!         socket.connect().await?;
//!         socket.subscribe().await?;
//!         socket.run_until_close().await
//!     });
//!
//!     while let Some(event) = event_rx.recv().await {
//!         println!("{} {}", event.classification(), event.event_id());
//!     }
//! }
//! ```

pub mod connectors;
pub mod events;
pub mod utils;
pub mod watchers;

// Re-export commonly used types
pub use connectors::{FeedError, FeedWebSocket, RawFeedMessage};
pub use events::{EventClassification, EventClassifier, FeedSchema, LiveEvent};
pub use watchers::SaleWatcher;
