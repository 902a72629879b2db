//! Topic naming for each notification family.
//!
//! Topic names are pure, total functions of the domain ids they route on.
//! The same mutation on the same resource resolves to the same topic in
//! every process, which is what lets the bus route across servers.

use crate::domain::foundation::{
    ActivityId, CoursewareElementId, DeploymentId, DocumentId, StudentId,
};

use super::EventDescriptor;

pub const AUTHOR_ACTIVITY: &str = "author.activity";
pub const LEARNER_PROGRESS: &str = "learner.progress";
pub const COMPETENCY_DOCUMENT: &str = "competency.document";

/// `author.activity/{activityId}`
pub fn author_activity(activity_id: &ActivityId) -> String {
    format!("{AUTHOR_ACTIVITY}/{activity_id}")
}

/// `learner.progress/{studentId}/{deploymentId}/{coursewareElementId}`
pub fn learner_progress(
    student_id: &StudentId,
    deployment_id: &DeploymentId,
    courseware_element_id: &CoursewareElementId,
) -> String {
    format!("{LEARNER_PROGRESS}/{student_id}/{deployment_id}/{courseware_element_id}")
}

/// `competency.document/{documentId}`
pub fn competency_document(document_id: &DocumentId) -> String {
    format!("{COMPETENCY_DOCUMENT}/{document_id}")
}

/// Diagnostic name of one event on one topic. Never used for routing.
pub fn instance_name(topic: &str, descriptor: &EventDescriptor) -> String {
    format!("{}/{}", topic, descriptor.effective_name())
}
