//! Learner progress notifications.

use serde::Serialize;

use crate::domain::foundation::{
    ClientId, CoursewareElementId, DeploymentId, DomainError, ElementType, StudentId,
};
use crate::domain::rtm::{
    topic, Consumable, EventDescriptor, Producer, RoutedPayload, RtmSubscription,
};

pub const BROADCAST_TYPE: &str = "learner.progress.broadcast";

pub const PROGRESS_UPDATED: EventDescriptor =
    EventDescriptor::new("STUDENT_PROGRESS_UPDATED", "PROGRESS");
pub const PROGRESS_RESET: EventDescriptor =
    EventDescriptor::new("STUDENT_PROGRESS_RESET", "PROGRESS_RESET");

pub fn events() -> Vec<EventDescriptor> {
    vec![PROGRESS_UPDATED, PROGRESS_RESET]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressBroadcast {
    pub student_id: StudentId,
    pub deployment_id: DeploymentId,
    pub courseware_element_id: CoursewareElementId,
    pub element_type: ElementType,
    pub completed: bool,
    /// Fraction complete in `0.0..=1.0`, absent for resets.
    pub completion_value: Option<f64>,
}

impl RoutedPayload for ProgressBroadcast {
    fn topic(&self) -> String {
        topic::learner_progress(
            &self.student_id,
            &self.deployment_id,
            &self.courseware_element_id,
        )
    }
}

#[derive(Debug, Clone)]
pub struct ProgressChange {
    pub event: EventDescriptor,
    pub student_id: StudentId,
    pub deployment_id: DeploymentId,
    pub courseware_element_id: CoursewareElementId,
    pub element_type: ElementType,
    pub completed: bool,
    pub completion_value: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressProducer;

impl Producer for ProgressProducer {
    type Params = ProgressChange;

    fn build(&self, origin: &ClientId, change: ProgressChange) -> Result<Consumable, DomainError> {
        let payload = ProgressBroadcast {
            student_id: change.student_id,
            deployment_id: change.deployment_id,
            courseware_element_id: change.courseware_element_id,
            element_type: change.element_type,
            completed: change.completed,
            completion_value: change.completion_value,
        };

        Consumable::from_payload(origin.clone(), change.event, BROADCAST_TYPE, &payload)
    }
}

/// Subscription to one student's progress on one element of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSubscription {
    pub student_id: StudentId,
    pub deployment_id: DeploymentId,
    pub courseware_element_id: CoursewareElementId,
}

impl RtmSubscription for ProgressSubscription {
    fn name(&self) -> &'static str {
        topic::LEARNER_PROGRESS
    }

    fn topic(&self) -> String {
        topic::learner_progress(
            &self.student_id,
            &self.deployment_id,
            &self.courseware_element_id,
        )
    }

    fn events(&self) -> Vec<EventDescriptor> {
        events()
    }
}
