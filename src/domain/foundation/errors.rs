//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Caller errors
    InvalidArgument,
    UnsupportedOperation,

    // Delivery errors
    ChannelOperationFailed,
    SerializationFailed,
    RegistryClosed,

    // Infrastructure errors
    BusUnavailable,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::UnsupportedOperation => "UNSUPPORTED_OPERATION",
            ErrorCode::ChannelOperationFailed => "CHANNEL_OPERATION_FAILED",
            ErrorCode::SerializationFailed => "SERIALIZATION_FAILED",
            ErrorCode::RegistryClosed => "REGISTRY_CLOSED",
            ErrorCode::BusUnavailable => "BUS_UNAVAILABLE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates an invalid-argument error for a specific argument.
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message).with_detail("argument", argument)
    }

    /// Creates a channel-operation error.
    pub fn channel(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ChannelOperationFailed, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::new(ErrorCode::SerializationFailed, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("client_id");
        assert_eq!(format!("{}", err), "Field 'client_id' cannot be empty");
    }

    #[test]
    fn validation_error_invalid_format_displays_correctly() {
        let err = ValidationError::invalid_format("element_type", "unknown variant");
        assert_eq!(
            format!("{}", err),
            "Field 'element_type' has invalid format: unknown variant"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::RegistryClosed, "Connection is closed");
        assert_eq!(format!("{}", err), "[REGISTRY_CLOSED] Connection is closed");
    }

    #[test]
    fn invalid_argument_records_argument_name() {
        let err = DomainError::invalid_argument("type", "type is required");

        assert_eq!(err.code, ErrorCode::InvalidArgument);
        assert_eq!(err.details.get("argument"), Some(&"type".to_string()));
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::channel("write failed")
            .with_detail("client_id", "c1")
            .with_detail("wire_type", "diffSync.ack");

        assert_eq!(err.code, ErrorCode::ChannelOperationFailed);
        assert_eq!(err.details.get("client_id"), Some(&"c1".to_string()));
        assert_eq!(err.details.get("wire_type"), Some(&"diffSync.ack".to_string()));
    }

    #[test]
    fn serde_error_converts_to_serialization_failed() {
        let err: DomainError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert_eq!(err.code, ErrorCode::SerializationFailed);
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::InvalidArgument), "INVALID_ARGUMENT");
        assert_eq!(
            format!("{}", ErrorCode::ChannelOperationFailed),
            "CHANNEL_OPERATION_FAILED"
        );
    }
}
