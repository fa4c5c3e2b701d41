//! WebSocket connector for the live auction feed.
//!
//! Delivers raw frames only: every JSON text frame is stamped and pushed
//! into the raw channel untouched. Normalization happens in the sale
//! watcher, never here.
//!
//! There is no reconnect or heartbeat machinery at this layer - a broken
//! connection surfaces as an error and the run ends.

use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, error, info};

/// Raw feed data before normalization.
///
/// Intermediate type owned by the socket layer. It MUST be converted to a
/// `LiveEvent` before being consumed downstream.
#[derive(Debug, Clone)]
pub struct RawFeedMessage {
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    #[error("Subscription failed: {0}")]
    SubscriptionFailed(String),

    #[error("Connection closed by server: {0}")]
    ConnectionClosed(String),
}

/// Connection state for the feed socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// WebSocket client for the auction feed.
pub struct FeedWebSocket {
    url: String,
    sale_channel: String,
    connection: Option<WebSocketStream<MaybeTlsStream<TcpStream>>>,
    state: ConnectionState,
    raw_tx: mpsc::Sender<RawFeedMessage>,
}

impl FeedWebSocket {
    /// Creates a new feed socket for one sale channel.
    pub fn new(url: String, sale_channel: String, raw_tx: mpsc::Sender<RawFeedMessage>) -> Self {
        Self {
            url,
            sale_channel,
            connection: None,
            state: ConnectionState::Disconnected,
            raw_tx,
        }
    }

    /// Returns the current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns the sale channel this socket subscribes to.
    pub fn sale_channel(&self) -> &str {
        &self.sale_channel
    }

    /// Establishes the WebSocket connection.
    pub async fn connect(&mut self) -> Result<(), FeedError> {
        info!("[{}] Connecting to feed: {}", self.sale_channel, self.url);
        self.state = ConnectionState::Connecting;

        match connect_async(&self.url).await {
            Ok((ws_stream, _response)) => {
                info!("[{}] Feed connected", self.sale_channel);
                self.connection = Some(ws_stream);
                self.state = ConnectionState::Connected;
                Ok(())
            }
            Err(e) => {
                error!("[{}] Feed connection failed: {}", self.sale_channel, e);
                self.state = ConnectionState::Disconnected;
                Err(FeedError::ConnectionFailed(e.to_string()))
            }
        }
    }

    /// Subscribes to the sale channel's event stream.
    pub async fn subscribe(&mut self) -> Result<(), FeedError> {
        let conn = self
            .connection
            .as_mut()
            .ok_or_else(|| FeedError::SubscriptionFailed("Not connected".to_string()))?;

        let subscribe_msg = SubscribeMessage {
            sale: self.sale_channel.clone(),
            type_: "subscribe".to_string(),
        };

        let msg_json = serde_json::to_string(&subscribe_msg)
            .map_err(|e| FeedError::SubscriptionFailed(e.to_string()))?;

        debug!("[{}] Sending subscription: {}", self.sale_channel, msg_json);

        conn.send(Message::Text(msg_json))
            .await
            .map_err(|e| FeedError::SendFailed(e.to_string()))?;

        info!("[{}] Subscribed", self.sale_channel);
        Ok(())
    }

    /// Runs the receive loop until the connection ends.
    ///
    /// Text frames are forwarded to the raw channel in arrival order;
    /// protocol pings are answered. Returns when the server closes the
    /// stream or the transport fails.
    pub async fn run_until_close(&mut self) -> Result<(), FeedError> {
        loop {
            let conn = match self.connection.as_mut() {
                Some(conn) => conn,
                None => return Err(FeedError::ConnectionFailed("No connection".to_string())),
            };

            match conn.next().await {
                Some(Ok(msg)) => self.handle_message(msg).await?,
                Some(Err(e)) => {
                    error!("[{}] Feed receive error: {}", self.sale_channel, e);
                    return Err(FeedError::ReceiveFailed(e.to_string()));
                }
                None => {
                    info!("[{}] Feed stream ended", self.sale_channel);
                    return Err(FeedError::ConnectionClosed("Stream ended".to_string()));
                }
            }
        }
    }

    /// Handles one incoming WebSocket message.
    async fn handle_message(&mut self, msg: Message) -> Result<(), FeedError> {
        match msg {
            Message::Text(text) => {
                match serde_json::from_str::<serde_json::Value>(&text) {
                    Ok(payload) => {
                        let raw = RawFeedMessage {
                            payload,
                            received_at: Utc::now(),
                        };

                        // Awaited send keeps arrival order under backpressure.
                        // A closed channel means the watcher is gone and the
                        // run is over.
                        self.raw_tx
                            .send(raw)
                            .await
                            .map_err(|_| FeedError::SendFailed("raw channel closed".to_string()))?;
                    }
                    Err(e) => {
                        debug!(
                            "[{}] Non-JSON frame ignored: {} ({})",
                            self.sale_channel, text, e
                        );
                    }
                }
            }
            Message::Ping(data) => {
                if let Some(conn) = self.connection.as_mut() {
                    let _ = conn.send(Message::Pong(data)).await;
                }
            }
            Message::Pong(_) => {
                debug!("[{}] Pong frame", self.sale_channel);
            }
            Message::Close(frame) => {
                let reason = frame
                    .map(|f| f.reason.to_string())
                    .unwrap_or_else(|| "Unknown".to_string());
                info!("[{}] Feed closed by server: {}", self.sale_channel, reason);
                return Err(FeedError::ConnectionClosed(reason));
            }
            Message::Binary(_) => {
                debug!("[{}] Binary frame ignored", self.sale_channel);
            }
            Message::Frame(_) => {
                // Raw frames are not seen at this level.
            }
        }

        Ok(())
    }

    /// Gracefully closes the connection.
    pub async fn close(&mut self) {
        if let Some(mut conn) = self.connection.take() {
            let _ = conn.close(None).await;
        }
        self.state = ConnectionState::Disconnected;
        info!("[{}] Feed socket closed", self.sale_channel);
    }
}

#[derive(Debug, Serialize)]
struct SubscribeMessage {
    sale: String,
    #[serde(rename = "type")]
    type_: String,
}

impl std::fmt::Debug for FeedWebSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedWebSocket")
            .field("url", &self.url)
            .field("sale_channel", &self.sale_channel)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_state_initial() {
        let (tx, _rx) = mpsc::channel(100);
        let ws = FeedWebSocket::new(
            "wss://example.invalid/live".to_string(),
            "sale-1".to_string(),
            tx,
        );
        assert_eq!(ws.state(), ConnectionState::Disconnected);
        assert_eq!(ws.sale_channel(), "sale-1");
    }

    #[test]
    fn test_subscribe_message_serialization() {
        let msg = SubscribeMessage {
            sale: "evening-sale-42".to_string(),
            type_: "subscribe".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"sale\":\"evening-sale-42\""));
        assert!(json.contains("\"type\":\"subscribe\""));
    }
}
