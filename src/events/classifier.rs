//! Classification of raw feed messages into typed events.
//!
//! The classifier is a pure function over a single message: no I/O, no
//! shared state, deterministic for a given schema. Concurrent calls over
//! independent messages need no synchronization.
//!
//! Lot lifecycle ordering (lot opened, bids, warnings, final call, close)
//! is a consumer concern - nothing here validates cross-event ordering.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::live_event::{
    BidEvent, ClosedEvent, EventClassification, FinalCallEvent, LiveEvent, LotOpenEvent,
    UnknownEvent, WarningEvent,
};

/// Wire key the classification tag lives under. Fixed by the feed
/// contract; every other key name is deployment configuration.
const TYPE_KEY: &str = "type";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The `type` or identifier field is absent, not a string, or empty.
    /// The message cannot be attributed to any event.
    #[error("malformed message: missing or non-string `{key}`")]
    MalformedMessage { key: String },

    /// Classification resolved to a bid but the amount field is absent or
    /// not an exact integer. A data-integrity signal from the feed, not a
    /// local bug.
    #[error("bid `{event_id}`: missing or non-numeric `{key}`")]
    MissingRequiredField { event_id: String, key: String },
}

/// Wire key names for the fields the classifier reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WireKeys {
    /// Key of the identifier field, mapped to `event_id`.
    pub id: String,
    /// Key of the bid amount field, in minor currency units.
    pub amount: String,
    /// Key of the bid origin field.
    pub source: String,
    /// Key of the bid acknowledgment flag.
    pub confirmed: String,
}

impl Default for WireKeys {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            amount: "amount".to_string(),
            source: "source".to_string(),
            confirmed: "confirmed".to_string(),
        }
    }
}

/// Feed schema: wire key names plus the tag table mapping recognized
/// type strings to classifications.
///
/// Tag spellings and key names are owned by the feed contract and evolve
/// with it, so they are data, not literals in decode logic. A deployment
/// overrides the defaults by loading a JSON schema file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedSchema {
    pub keys: WireKeys,
    pub tags: HashMap<String, EventClassification>,
}

impl Default for FeedSchema {
    fn default() -> Self {
        let mut tags = HashMap::new();
        tags.insert("lot_opened".to_string(), EventClassification::LotOpen);
        tags.insert("bid".to_string(), EventClassification::Bid);
        tags.insert("warning".to_string(), EventClassification::Warning);
        tags.insert("final_call".to_string(), EventClassification::FinalCall);
        tags.insert("lot_closed".to_string(), EventClassification::Closed);

        Self {
            keys: WireKeys::default(),
            tags,
        }
    }
}

impl FeedSchema {
    /// Looks a wire tag up in the tag table.
    ///
    /// Total: any tag outside the table is `Unknown`. "Unrecognized" and
    /// `Unknown` are the same condition by construction.
    pub fn classification_of(&self, raw_type: &str) -> EventClassification {
        self.tags
            .get(raw_type)
            .copied()
            .unwrap_or(EventClassification::Unknown)
    }
}

/// Decodes raw feed messages into [`LiveEvent`]s.
///
/// The only constructor path for event records: consumers receive fully
/// populated, immutable instances and read fields, nothing else.
#[derive(Debug, Clone, Default)]
pub struct EventClassifier {
    schema: FeedSchema,
}

impl EventClassifier {
    /// Creates a classifier over the given feed schema.
    pub fn new(schema: FeedSchema) -> Self {
        Self { schema }
    }

    /// Returns the schema this classifier decodes against.
    pub fn schema(&self) -> &FeedSchema {
        &self.schema
    }

    /// Decodes one raw message into a typed event.
    ///
    /// Succeeds for every message carrying a non-empty `type` and
    /// identifier; unrecognized tags yield `LiveEvent::Unknown`, never an
    /// error. Fields that do not belong to the resolved variant are
    /// ignored.
    pub fn classify(&self, payload: &Value) -> Result<LiveEvent, DecodeError> {
        let raw_type = require_string(payload, TYPE_KEY)?;
        let event_id = require_string(payload, &self.schema.keys.id)?;

        let event = match self.schema.classification_of(&raw_type) {
            EventClassification::LotOpen => LiveEvent::LotOpen(LotOpenEvent {
                raw_type,
                event_id,
            }),
            EventClassification::Bid => {
                let amount_cents = self.decode_amount(payload, &event_id)?;
                let source = optional_string(payload, &self.schema.keys.source);
                let is_confirmed = payload
                    .get(&self.schema.keys.confirmed)
                    .and_then(Value::as_bool)
                    .unwrap_or(false);

                LiveEvent::Bid(BidEvent {
                    raw_type,
                    event_id,
                    amount_cents,
                    source,
                    is_confirmed,
                })
            }
            EventClassification::Warning => LiveEvent::Warning(WarningEvent {
                raw_type,
                event_id,
            }),
            EventClassification::FinalCall => LiveEvent::FinalCall(FinalCallEvent {
                raw_type,
                event_id,
            }),
            EventClassification::Closed => LiveEvent::Closed(ClosedEvent {
                raw_type,
                event_id,
            }),
            EventClassification::Unknown => LiveEvent::Unknown(UnknownEvent {
                raw_type,
                event_id,
            }),
        };

        Ok(event)
    }

    fn decode_amount(&self, payload: &Value, event_id: &str) -> Result<i64, DecodeError> {
        payload
            .get(&self.schema.keys.amount)
            .and_then(coerce_integer)
            .ok_or_else(|| DecodeError::MissingRequiredField {
                event_id: event_id.to_string(),
                key: self.schema.keys.amount.clone(),
            })
    }
}

/// Coerces a wire value to an exact integer.
///
/// Accepts JSON integers, floats with no fractional part, and numeric
/// strings (the feed ships numbers as strings on some paths). Anything
/// that would round or truncate is rejected.
fn coerce_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    if let Some(f) = value.as_f64() {
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is strict.
        if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            return Some(f as i64);
        }
        return None;
    }
    value.as_str().and_then(|s| s.parse::<i64>().ok())
}

fn require_string(payload: &Value, key: &str) -> Result<String, DecodeError> {
    match payload.get(key).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(DecodeError::MalformedMessage {
            key: key.to_string(),
        }),
    }
}

fn optional_string(payload: &Value, key: &str) -> String {
    payload
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classifier() -> EventClassifier {
        EventClassifier::default()
    }

    #[test]
    fn test_lot_opened_classifies_to_lot_open() {
        let event = classifier()
            .classify(&json!({"type": "lot_opened", "id": "L1"}))
            .unwrap();

        assert!(matches!(event, LiveEvent::LotOpen(_)));
        assert_eq!(event.classification(), EventClassification::LotOpen);
        assert_eq!(event.event_id(), "L1");
        assert_eq!(event.amount_cents(), 0);
    }

    #[test]
    fn test_bid_decodes_full_payload() {
        let event = classifier()
            .classify(&json!({
                "type": "bid",
                "id": "B7",
                "amount": 150000,
                "source": "phone",
                "confirmed": true
            }))
            .unwrap();

        let bid = match &event {
            LiveEvent::Bid(bid) => bid,
            other => panic!("expected a bid, got {:?}", other),
        };
        assert_eq!(bid.event_id(), "B7");
        assert_eq!(bid.amount_cents(), 150_000);
        assert_eq!(bid.source(), "phone");
        assert!(bid.is_confirmed());
        assert_eq!(event.classification(), EventClassification::Bid);
    }

    #[test]
    fn test_lot_closed_classifies_to_closed() {
        let event = classifier()
            .classify(&json!({"type": "lot_closed", "id": "L1"}))
            .unwrap();

        assert!(matches!(event, LiveEvent::Closed(_)));
        assert_eq!(event.event_id(), "L1");
    }

    #[test]
    fn test_warning_and_final_call_tags() {
        let warning = classifier()
            .classify(&json!({"type": "warning", "id": "W2"}))
            .unwrap();
        let final_call = classifier()
            .classify(&json!({"type": "final_call", "id": "F3"}))
            .unwrap();

        assert!(matches!(warning, LiveEvent::Warning(_)));
        assert!(matches!(final_call, LiveEvent::FinalCall(_)));
    }

    #[test]
    fn test_unrecognized_tag_is_unknown_not_error() {
        let event = classifier()
            .classify(&json!({"type": "some_new_tag", "id": "X9"}))
            .unwrap();

        assert!(matches!(event, LiveEvent::Unknown(_)));
        assert_eq!(event.classification(), EventClassification::Unknown);
        assert_eq!(event.event_id(), "X9");
        assert_eq!(event.raw_type(), "some_new_tag");
    }

    #[test]
    fn test_missing_type_is_malformed() {
        let err = classifier()
            .classify(&json!({"id": "X9"}))
            .unwrap_err();

        assert_eq!(
            err,
            DecodeError::MalformedMessage {
                key: "type".to_string()
            }
        );
    }

    #[test]
    fn test_empty_or_non_string_type_is_malformed() {
        let c = classifier();
        assert!(c.classify(&json!({"type": "", "id": "X1"})).is_err());
        assert!(c.classify(&json!({"type": 7, "id": "X1"})).is_err());
    }

    #[test]
    fn test_missing_or_empty_id_is_malformed() {
        let c = classifier();
        let err = c.classify(&json!({"type": "bid"})).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MalformedMessage {
                key: "id".to_string()
            }
        );
        assert!(c.classify(&json!({"type": "bid", "id": ""})).is_err());
    }

    #[test]
    fn test_non_object_payload_is_malformed() {
        assert!(classifier().classify(&json!("lot_opened")).is_err());
        assert!(classifier().classify(&json!(null)).is_err());
    }

    #[test]
    fn test_bid_without_amount_is_missing_required_field() {
        let err = classifier()
            .classify(&json!({"type": "bid", "id": "B1"}))
            .unwrap_err();

        assert_eq!(
            err,
            DecodeError::MissingRequiredField {
                event_id: "B1".to_string(),
                key: "amount".to_string()
            }
        );
    }

    #[test]
    fn test_bid_defaults_for_optional_fields() {
        let event = classifier()
            .classify(&json!({"type": "bid", "id": "B2", "amount": 4200}))
            .unwrap();

        assert_eq!(event.amount_cents(), 4200);
        assert_eq!(event.source(), "");
        assert!(!event.is_confirmed());
    }

    #[test]
    fn test_amount_coercion_is_exact() {
        let c = classifier();

        // Integral float and numeric string both decode to the same value.
        let from_float = c
            .classify(&json!({"type": "bid", "id": "B3", "amount": 150000.0}))
            .unwrap();
        let from_string = c
            .classify(&json!({"type": "bid", "id": "B3", "amount": "150000"}))
            .unwrap();
        assert_eq!(from_float.amount_cents(), 150_000);
        assert_eq!(from_string.amount_cents(), 150_000);

        // Large amounts survive without truncation.
        let large = c
            .classify(&json!({"type": "bid", "id": "B4", "amount": 9_000_000_000_i64}))
            .unwrap();
        assert_eq!(large.amount_cents(), 9_000_000_000);

        // Fractional amounts are rejected rather than rounded.
        let err = c
            .classify(&json!({"type": "bid", "id": "B5", "amount": 1500.5}))
            .unwrap_err();
        assert!(matches!(err, DecodeError::MissingRequiredField { .. }));
    }

    #[test]
    fn test_extraneous_fields_are_ignored() {
        let event = classifier()
            .classify(&json!({
                "type": "lot_opened",
                "id": "L9",
                "amount": 999,
                "source": "floor",
                "confirmed": true,
                "operator": "room-3"
            }))
            .unwrap();

        // Payload fields outside the variant stay at their defaults.
        assert!(matches!(event, LiveEvent::LotOpen(_)));
        assert_eq!(event.amount_cents(), 0);
        assert_eq!(event.source(), "");
        assert!(!event.is_confirmed());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let payload = json!({
            "type": "bid",
            "id": "B7",
            "amount": 150000,
            "source": "phone",
            "confirmed": true
        });
        let c = classifier();

        let first = c.classify(&payload).unwrap();
        let second = c.classify(&payload).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_schema_renames_keys_and_tags() {
        let schema: FeedSchema = serde_json::from_value(json!({
            "keys": {
                "id": "lotRef",
                "amount": "amountCents",
                "source": "bidSource",
                "confirmed": "ack"
            },
            "tags": {
                "LotOpened": "LotOpen",
                "FirstPriceBidPlaced": "Bid",
                "LotSold": "Closed"
            }
        }))
        .unwrap();
        let c = EventClassifier::new(schema);

        let event = c
            .classify(&json!({
                "type": "FirstPriceBidPlaced",
                "lotRef": "54321",
                "amountCents": "875000",
                "bidSource": "online",
                "ack": true
            }))
            .unwrap();

        assert_eq!(event.classification(), EventClassification::Bid);
        assert_eq!(event.event_id(), "54321");
        assert_eq!(event.amount_cents(), 875_000);
        assert_eq!(event.source(), "online");
        assert!(event.is_confirmed());
        assert_eq!(event.raw_type(), "FirstPriceBidPlaced");

        // The default spellings are not special under a custom schema.
        let off_schema = c.classify(&json!({"type": "bid", "lotRef": "1"})).unwrap();
        assert_eq!(off_schema.classification(), EventClassification::Unknown);
    }
}
