//! Connectors for the live feed transport.
//!
//! Low-level socket client only. All data received here is raw and must
//! be normalized through the events layer before use.

pub mod websocket;

pub use websocket::{ConnectionState, FeedError, FeedWebSocket, RawFeedMessage};
