//! Diff-sync handshake bodies.
//!
//! The handshake runs `START → {PATCH → ACK}* → END` over one channel per
//! client. Patch contents come from the external diff algorithm and are
//! carried here without interpretation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::rtm::fields_of;

/// The four handshake message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExchangeableType {
    Start,
    Patch,
    Ack,
    End,
}

impl ExchangeableType {
    pub const ALL: [ExchangeableType; 4] = [
        ExchangeableType::Start,
        ExchangeableType::Patch,
        ExchangeableType::Ack,
        ExchangeableType::End,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeableType::Start => "START",
            ExchangeableType::Patch => "PATCH",
            ExchangeableType::Ack => "ACK",
            ExchangeableType::End => "END",
        }
    }
}

impl fmt::Display for ExchangeableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExchangeableType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::UnsupportedOperation,
                    format!("unsupported exchangeable type '{s}'"),
                )
            })
    }
}

/// A handshake body that can travel over a channel.
pub trait Exchangeable: fmt::Debug + Send + Sync {
    /// The body's kind. `None` only for untyped bodies, which channels reject.
    fn exchange_type(&self) -> Option<ExchangeableType>;

    /// Flattened body fields for the wire `response` object.
    fn fields(&self) -> Result<Map<String, Value>, DomainError>;
}

/// Shadow/server version pair tracked by both ends of the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Version {
    /// Client-side version.
    pub n: u64,
    /// Server-side version.
    pub m: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Start {
    pub entity_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    pub entity_name: String,
    pub version: Version,
    /// Opaque edit script produced by the diff algorithm.
    pub patches: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ack {
    pub entity_name: String,
    pub version: Version,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct End {
    pub entity_name: String,
}

macro_rules! exchangeable {
    ($body:ident, $kind:expr) => {
        impl Exchangeable for $body {
            fn exchange_type(&self) -> Option<ExchangeableType> {
                Some($kind)
            }

            fn fields(&self) -> Result<Map<String, Value>, DomainError> {
                fields_of(self)
            }
        }
    };
}

exchangeable!(Start, ExchangeableType::Start);
exchangeable!(Patch, ExchangeableType::Patch);
exchangeable!(Ack, ExchangeableType::Ack);
exchangeable!(End, ExchangeableType::End);

/// A body whose kind is only known at runtime, e.g. decoded from a client
/// frame. The kind may be missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawExchangeable {
    pub exchange_type: Option<ExchangeableType>,
    pub fields: Map<String, Value>,
}

impl Exchangeable for RawExchangeable {
    fn exchange_type(&self) -> Option<ExchangeableType> {
        self.exchange_type
    }

    fn fields(&self) -> Result<Map<String, Value>, DomainError> {
        Ok(self.fields.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_every_known_type() {
        for kind in ExchangeableType::ALL {
            assert_eq!(kind.as_str().parse::<ExchangeableType>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_type_is_unsupported() {
        let err = "REWIND".parse::<ExchangeableType>().unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedOperation);
    }

    #[test]
    fn bodies_report_their_kind() {
        let entity = "courseware".to_string();
        assert_eq!(
            Start { entity_name: entity.clone() }.exchange_type(),
            Some(ExchangeableType::Start)
        );
        assert_eq!(
            Ack { entity_name: entity.clone(), version: Version::default() }.exchange_type(),
            Some(ExchangeableType::Ack)
        );
        assert_eq!(End { entity_name: entity }.exchange_type(), Some(ExchangeableType::End));
    }

    #[test]
    fn patch_fields_are_flattened() {
        let patch = Patch {
            entity_name: "activity:1".to_string(),
            version: Version { n: 2, m: 5 },
            patches: vec!["@@ -1,3 +1,4 @@".to_string()],
        };

        let fields = patch.fields().unwrap();

        assert_eq!(fields["entityName"], json!("activity:1"));
        assert_eq!(fields["version"], json!({"n": 2, "m": 5}));
        assert_eq!(fields["patches"], json!(["@@ -1,3 +1,4 @@"]));
    }

    #[test]
    fn raw_body_may_be_untyped() {
        let raw = RawExchangeable::default();
        assert_eq!(raw.exchange_type(), None);
        assert!(raw.fields().unwrap().is_empty());
    }
}
