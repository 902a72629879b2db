//! Maps handshake kinds to wire message types.

use crate::domain::diffsync::ExchangeableType;
use crate::domain::foundation::DomainError;

pub const DIFF_SYNC_START: &str = "diffSync.start";
pub const DIFF_SYNC_PATCH: &str = "diffSync.patch";
pub const DIFF_SYNC_ACK: &str = "diffSync.ack";
pub const DIFF_SYNC_END: &str = "diffSync.end";

/// Total mapping from [`ExchangeableType`] to its wire `type`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageTypeBridge;

impl MessageTypeBridge {
    pub fn new() -> Self {
        Self
    }

    /// Wire type for a body kind.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the body carries no kind.
    pub fn map(&self, exchange_type: Option<ExchangeableType>) -> Result<&'static str, DomainError> {
        let exchange_type = exchange_type.ok_or_else(|| {
            DomainError::invalid_argument("type", "exchangeable type is required")
        })?;

        Ok(match exchange_type {
            ExchangeableType::Start => DIFF_SYNC_START,
            ExchangeableType::Patch => DIFF_SYNC_PATCH,
            ExchangeableType::Ack => DIFF_SYNC_ACK,
            ExchangeableType::End => DIFF_SYNC_END,
        })
    }

    /// Wire type for a kind given by name, e.g. from an untrusted frame.
    ///
    /// # Errors
    ///
    /// `UnsupportedOperation` when the name is not one of the four kinds.
    pub fn map_name(&self, name: &str) -> Result<&'static str, DomainError> {
        let exchange_type: ExchangeableType = name.parse()?;
        self.map(Some(exchange_type))
    }
}
