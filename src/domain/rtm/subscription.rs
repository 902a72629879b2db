//! Subscription family definitions.

use super::EventDescriptor;

/// A named group of event kinds that share one topic.
///
/// Clients subscribe to a family ("everything that happens under activity
/// X") rather than to individual event kinds; the registry expands the
/// family into one consumer per descriptor.
pub trait RtmSubscription: Send + Sync {
    /// Family name used in logs and on the inbound protocol, e.g. `author.activity`.
    fn name(&self) -> &'static str;

    fn topic(&self) -> String;

    /// Descriptors a subscriber to this family receives.
    fn events(&self) -> Vec<EventDescriptor>;
}
