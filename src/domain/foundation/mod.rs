//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, enums, and error types that form the vocabulary
//! of the real-time messaging layer.

mod element_type;
mod errors;
mod ids;

pub use element_type::ElementType;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    ActivityId, ClientId, CoursewareElementId, DeploymentId, DocumentId, DocumentItemId,
    StudentId,
};
