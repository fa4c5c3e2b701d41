//! Event system for the auction feed client.
//!
//! All external signals MUST be converted into normalized typed events
//! before being consumed downstream. Raw socket data must NEVER drive
//! consumers directly.

mod classifier;
mod live_event;

pub use classifier::{DecodeError, EventClassifier, FeedSchema, WireKeys};
pub use live_event::{
    BidEvent, ClosedEvent, EventClassification, FinalCallEvent, LiveEvent, LotOpenEvent,
    UnknownEvent, WarningEvent,
};
