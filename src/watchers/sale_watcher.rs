//! Sale watcher: normalizes raw feed frames into typed events.
//!
//! A single task drains the raw channel, classifies each message, and
//! emits events in the order their raw messages arrived. A message that
//! fails to decode is logged and dropped - it never stops the stream.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::connectors::RawFeedMessage;
use crate::events::{EventClassifier, LiveEvent};

/// Normalization loop for one sale channel.
pub struct SaleWatcher {
    classifier: EventClassifier,
    raw_rx: mpsc::Receiver<RawFeedMessage>,
    event_tx: mpsc::Sender<LiveEvent>,
    decoded: u64,
    rejected: u64,
}

impl SaleWatcher {
    /// Creates a new sale watcher over a classifier and its channels.
    pub fn new(
        classifier: EventClassifier,
        raw_rx: mpsc::Receiver<RawFeedMessage>,
        event_tx: mpsc::Sender<LiveEvent>,
    ) -> Self {
        Self {
            classifier,
            raw_rx,
            event_tx,
            decoded: 0,
            rejected: 0,
        }
    }

    /// Runs the watcher until the raw channel closes.
    pub async fn run(mut self) {
        info!("SaleWatcher starting");

        while let Some(raw) = self.raw_rx.recv().await {
            self.process_raw(raw).await;
        }

        info!(
            "SaleWatcher stopped (decoded: {}, rejected: {})",
            self.decoded, self.rejected
        );
    }

    /// Processes one raw frame.
    ///
    /// The feed can send either a single object or an array batch (the
    /// opening snapshot batches the already-elapsed events of the sale).
    async fn process_raw(&mut self, raw: RawFeedMessage) {
        if let Some(batch) = raw.payload.as_array() {
            for item in batch {
                self.process_single(item).await;
            }
        } else {
            self.process_single(&raw.payload).await;
        }
    }

    /// Classifies a single message object and emits the event.
    async fn process_single(&mut self, payload: &serde_json::Value) {
        match self.classifier.classify(payload) {
            Ok(event) => {
                self.decoded += 1;
                debug!(
                    "Decoded {} event {} (tag: {})",
                    event.classification(),
                    event.event_id(),
                    event.raw_type()
                );

                if let Err(e) = self.event_tx.send(event).await {
                    warn!("Failed to emit event: {}", e);
                }
            }
            Err(e) => {
                // Per-message failure: drop it, keep the stream alive.
                self.rejected += 1;
                warn!("Dropping message: {}", e);
            }
        }
    }
}
