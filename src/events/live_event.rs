//! Typed events for the live-auction feed.
//!
//! Every raw feed frame is decoded into exactly one of these variants
//! before any downstream logic sees it. Raw socket JSON must NEVER drive
//! consumers directly.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Derived category of a feed event, computed from its wire tag.
///
/// `Unknown` is a successful classification, not an error: tags the feed
/// grows after this client ships still decode instead of crashing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventClassification {
    LotOpen,
    Bid,
    Warning,
    FinalCall,
    Closed,
    Unknown,
}

impl fmt::Display for EventClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventClassification::LotOpen => "lot_open",
            EventClassification::Bid => "bid",
            EventClassification::Warning => "warning",
            EventClassification::FinalCall => "final_call",
            EventClassification::Closed => "closed",
            EventClassification::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// A lot has been put under the hammer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotOpenEvent {
    pub(crate) raw_type: String,
    pub(crate) event_id: String,
}

impl LotOpenEvent {
    /// Returns the wire tag, preserved verbatim.
    pub fn raw_type(&self) -> &str {
        &self.raw_type
    }

    /// Returns the event identifier.
    pub fn event_id(&self) -> &str {
        &self.event_id
    }
}

/// A bid was placed on the open lot.
///
/// The only variant that carries a decoded payload beyond the common
/// fields: the amount in minor currency units, the originating channel,
/// and the confirmation flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidEvent {
    pub(crate) raw_type: String,
    pub(crate) event_id: String,
    pub(crate) amount_cents: i64,
    pub(crate) source: String,
    pub(crate) is_confirmed: bool,
}

impl BidEvent {
    /// Returns the wire tag, preserved verbatim.
    pub fn raw_type(&self) -> &str {
        &self.raw_type
    }

    /// Returns the event identifier.
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    /// Returns the bid amount in minor currency units. Decoded exactly,
    /// never rounded.
    pub fn amount_cents(&self) -> i64 {
        self.amount_cents
    }

    /// Returns the channel/bidder path that produced the bid. Empty when
    /// the feed did not say.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns whether the saleroom has acknowledged the bid.
    pub fn is_confirmed(&self) -> bool {
        self.is_confirmed
    }
}

/// The auctioneer issued a warning on the open lot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningEvent {
    pub(crate) raw_type: String,
    pub(crate) event_id: String,
}

impl WarningEvent {
    pub fn raw_type(&self) -> &str {
        &self.raw_type
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }
}

/// Final call before the hammer falls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalCallEvent {
    pub(crate) raw_type: String,
    pub(crate) event_id: String,
}

impl FinalCallEvent {
    pub fn raw_type(&self) -> &str {
        &self.raw_type
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }
}

/// The lot was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedEvent {
    pub(crate) raw_type: String,
    pub(crate) event_id: String,
}

impl ClosedEvent {
    pub fn raw_type(&self) -> &str {
        &self.raw_type
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }
}

/// An event whose wire tag the schema does not recognize.
///
/// Carries only the common fields. Downstream code can log or forward it
/// (the tag is preserved) but has nothing to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEvent {
    pub(crate) raw_type: String,
    pub(crate) event_id: String,
}

impl UnknownEvent {
    pub fn raw_type(&self) -> &str {
        &self.raw_type
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }
}

/// A classified feed event - all downstream logic consumes ONLY this type.
///
/// The base contract: every variant exposes the wire tag, the event id,
/// and the derived classification. The bid payload accessors are exposed
/// here too, for caller convenience, and return fixed defaults when the
/// variant does not carry them - consumers never deal with an absent
/// representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveEvent {
    LotOpen(LotOpenEvent),
    Bid(BidEvent),
    Warning(WarningEvent),
    FinalCall(FinalCallEvent),
    Closed(ClosedEvent),
    /// Fallback for unrecognized wire tags. Never one of the named
    /// variants above.
    Unknown(UnknownEvent),
}

impl LiveEvent {
    /// Returns the original wire tag, preserved verbatim for diagnostics
    /// and forwarding.
    pub fn raw_type(&self) -> &str {
        match self {
            LiveEvent::LotOpen(e) => &e.raw_type,
            LiveEvent::Bid(e) => &e.raw_type,
            LiveEvent::Warning(e) => &e.raw_type,
            LiveEvent::FinalCall(e) => &e.raw_type,
            LiveEvent::Closed(e) => &e.raw_type,
            LiveEvent::Unknown(e) => &e.raw_type,
        }
    }

    /// Returns the event identifier, unique within a feed session and
    /// never empty.
    pub fn event_id(&self) -> &str {
        match self {
            LiveEvent::LotOpen(e) => &e.event_id,
            LiveEvent::Bid(e) => &e.event_id,
            LiveEvent::Warning(e) => &e.event_id,
            LiveEvent::FinalCall(e) => &e.event_id,
            LiveEvent::Closed(e) => &e.event_id,
            LiveEvent::Unknown(e) => &e.event_id,
        }
    }

    /// Returns the derived classification.
    ///
    /// Never stored alongside the tag: it is recomputed from the variant,
    /// so it cannot desynchronize from `raw_type`.
    pub fn classification(&self) -> EventClassification {
        match self {
            LiveEvent::LotOpen(_) => EventClassification::LotOpen,
            LiveEvent::Bid(_) => EventClassification::Bid,
            LiveEvent::Warning(_) => EventClassification::Warning,
            LiveEvent::FinalCall(_) => EventClassification::FinalCall,
            LiveEvent::Closed(_) => EventClassification::Closed,
            LiveEvent::Unknown(_) => EventClassification::Unknown,
        }
    }

    /// Returns the bid amount in minor currency units.
    ///
    /// `0` for every non-bid variant. The default is a concrete value by
    /// contract - callers may rely on it.
    pub fn amount_cents(&self) -> i64 {
        match self {
            LiveEvent::Bid(e) => e.amount_cents,
            _ => 0,
        }
    }

    /// Returns the origin tag of the event. `""` for every non-bid
    /// variant.
    pub fn source(&self) -> &str {
        match self {
            LiveEvent::Bid(e) => &e.source,
            _ => "",
        }
    }

    /// Returns the acknowledgment flag. `false` for every non-bid
    /// variant.
    pub fn is_confirmed(&self) -> bool {
        match self {
            LiveEvent::Bid(e) => e.is_confirmed,
            _ => false,
        }
    }
}
