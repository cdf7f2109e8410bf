//! Event Envelope Parsing
//!
//! Decodes the raw webhook body into typed envelopes. Only `event` and
//! `entity.id` are required; every other entity field passes through as JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::CallbackError;

/// The record an event is about (chat, message or user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Entity {
    /// Entity with no fields besides its id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// String field lookup, `None` when absent or not a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Decoded event notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Dotted event kind, e.g. `user_chat.created`. Unknown kinds are valid.
    pub event: String,
    pub entity: Entity,
}

/// A delivery carries one envelope, or several when the platform batches.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Delivery {
    Batch(Vec<Envelope>),
    Single(Envelope),
}

/// Parse a webhook body into its envelopes.
///
/// All-or-nothing: one malformed element rejects the whole body.
pub fn parse(raw: &[u8]) -> Result<Vec<Envelope>, CallbackError> {
    let value: Value = serde_json::from_slice(raw)
        .map_err(|e| CallbackError::MalformedPayload(format!("invalid JSON: {e}")))?;

    let delivery: Delivery = serde_json::from_value(value).map_err(|_| {
        CallbackError::MalformedPayload("expected `event` and `entity.id`".to_string())
    })?;

    let envelopes = match delivery {
        Delivery::Single(envelope) => vec![envelope],
        Delivery::Batch(envelopes) if envelopes.is_empty() => {
            return Err(CallbackError::MalformedPayload("empty batch".to_string()));
        }
        Delivery::Batch(envelopes) => envelopes,
    };

    Ok(envelopes)
}
