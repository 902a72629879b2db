//! Immutable payload envelope carried by a consumable.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{DomainError, ErrorCode};

/// Flat key/value view of a notification's domain fields.
///
/// Built once from a typed payload struct and never mutated afterwards.
/// Fields that a notification kind intentionally omits are simply absent
/// (or `null`); readers must tolerate both.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BroadcastPayload(Map<String, Value>);

impl BroadcastPayload {
    /// Flattens any struct that serializes to a JSON object.
    ///
    /// # Errors
    ///
    /// `SerializationFailed` if the value cannot be serialized or is not an
    /// object.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self, DomainError> {
        fields_of(value).map(Self)
    }

    /// Returns a field, treating explicit `null` the same as absence.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Serializes a value and returns its top-level object fields.
pub fn fields_of<T: Serialize + ?Sized>(value: &T) -> Result<Map<String, Value>, DomainError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(DomainError::new(
            ErrorCode::SerializationFailed,
            "payload must serialize to a JSON object",
        )
        .with_detail("kind", json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
