//! Concrete notification families.
//!
//! Each family bundles its descriptors, payload, producer and subscription
//! definition:
//!
//! - [`activity`] - `author.activity/{activityId}`, element-scoped names
//! - [`learner_progress`] - `learner.progress/{studentId}/{deploymentId}/{elementId}`
//! - [`competency`] - `competency.document/{documentId}`

pub mod activity;
pub mod competency;
pub mod learner_progress;

pub use activity::{ActivityBroadcast, ActivityChange, ActivityProducer, ActivitySubscription};
pub use competency::{DocumentBroadcast, DocumentChange, DocumentProducer, DocumentSubscription};
pub use learner_progress::{
    ProgressBroadcast, ProgressChange, ProgressProducer, ProgressSubscription,
};
