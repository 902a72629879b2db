//! Per-connection subscription bookkeeping.
//!
//! Each connection owns exactly one registry. Entries are keyed by
//! `(topic, descriptor)`:
//!
//! ```text
//! UNSUBSCRIBED ──subscribe──▶ SUBSCRIBED ──unsubscribe/teardown──▶ UNSUBSCRIBED
//!      ▲  subscribe when SUBSCRIBED: no-op          unsubscribe when
//!      └──────────────────────────────────────────  UNSUBSCRIBED: no-op
//! ```
//!
//! Entries on one topic never overlap: an unscoped descriptor covers every
//! element scoping of its kind, so subscribing to a covered descriptor is a
//! no-op and subscribing to a covering one replaces the narrower entries.
//! Each consumable is therefore rendered by at most one consumer.
//!
//! Teardown removes every entry under one lock acquisition and closes the
//! registry, so nothing registered by a connection outlives it.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::foundation::{ClientId, DomainError, ErrorCode};
use crate::domain::rtm::{EventDescriptor, RtmSubscription};
use crate::ports::{Bus, ListenerHandle, WebSocketSession};

use super::consumer::Consumer;

/// Registry key: one consumer per event kind per topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionKey {
    pub topic: String,
    pub descriptor: EventDescriptor,
}

impl SubscriptionKey {
    pub fn new(topic: impl Into<String>, descriptor: EventDescriptor) -> Self {
        Self {
            topic: topic.into(),
            descriptor,
        }
    }
}

#[derive(Default)]
struct RegistryState {
    entries: HashMap<SubscriptionKey, ListenerHandle>,
    closed: bool,
}

/// Active subscriptions of one connected client.
///
/// Mutations are serialized by an internal mutex, so overlapping
/// subscribe/unsubscribe messages from the same client are safe. The lock
/// is only held across local bus registration, never across network I/O.
pub struct SubscriptionRegistry {
    client_id: ClientId,
    session: Arc<dyn WebSocketSession>,
    bus: Arc<dyn Bus>,
    state: Mutex<RegistryState>,
}

impl SubscriptionRegistry {
    pub fn new(client_id: ClientId, session: Arc<dyn WebSocketSession>, bus: Arc<dyn Bus>) -> Self {
        Self {
            client_id,
            session,
            bus,
            state: Mutex::new(RegistryState::default()),
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Registers a consumer for `descriptor` on `topic`.
    ///
    /// Returns `true` if a new registration was made and `false` if an
    /// existing entry on `topic` already covers `descriptor`.
    ///
    /// # Errors
    ///
    /// `RegistryClosed` after [`teardown`](Self::teardown).
    pub async fn subscribe(
        &self,
        topic: &str,
        descriptor: EventDescriptor,
    ) -> Result<bool, DomainError> {
        let mut state = self.state.lock().await;
        self.subscribe_locked(&mut state, topic, descriptor)
    }

    /// Subscribes to every event kind of a family. Returns how many new
    /// registrations were made.
    pub async fn subscribe_family(
        &self,
        subscription: &dyn RtmSubscription,
    ) -> Result<usize, DomainError> {
        let topic = subscription.topic();
        let mut state = self.state.lock().await;

        let mut added = 0;
        for descriptor in subscription.events() {
            if self.subscribe_locked(&mut state, &topic, descriptor)? {
                added += 1;
            }
        }

        tracing::debug!(
            client_id = %self.client_id,
            family = subscription.name(),
            topic = %topic,
            added,
            "Subscribed to family"
        );
        Ok(added)
    }

    /// Removes the consumer for `descriptor` on `topic`. Returns `false` if
    /// the pair was not subscribed.
    pub async fn unsubscribe(&self, topic: &str, descriptor: &EventDescriptor) -> bool {
        let key = SubscriptionKey::new(topic, descriptor.clone());
        let mut state = self.state.lock().await;

        match state.entries.remove(&key) {
            Some(handle) => {
                self.bus.unsubscribe(&handle);
                tracing::debug!(
                    client_id = %self.client_id,
                    topic = %topic,
                    rtm_event = %descriptor,
                    "Unsubscribed"
                );
                true
            }
            None => false,
        }
    }

    /// Removes every event kind of a family. Returns how many were removed.
    pub async fn unsubscribe_family(&self, subscription: &dyn RtmSubscription) -> usize {
        self.unsubscribe_topic(&subscription.topic()).await
    }

    /// Removes every registration on `topic`.
    pub async fn unsubscribe_topic(&self, topic: &str) -> usize {
        let mut state = self.state.lock().await;
        let keys: Vec<SubscriptionKey> = state
            .entries
            .keys()
            .filter(|k| k.topic == topic)
            .cloned()
            .collect();

        for key in &keys {
            if let Some(handle) = state.entries.remove(key) {
                self.bus.unsubscribe(&handle);
            }
        }
        keys.len()
    }

    /// Removes every registration and closes the registry.
    ///
    /// Called when the connection closes. Idempotent; returns how many
    /// registrations were removed.
    pub async fn teardown(&self) -> usize {
        let mut state = self.state.lock().await;
        state.closed = true;
        let removed = self.release_all(&mut state);

        tracing::debug!(client_id = %self.client_id, removed, "Subscription registry torn down");
        removed
    }

    /// Whether events described by `descriptor` on `topic` reach this client.
    pub async fn is_subscribed(&self, topic: &str, descriptor: &EventDescriptor) -> bool {
        let state = self.state.lock().await;
        Self::covers(&state, topic, descriptor)
    }

    pub async fn active_count(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    /// Distinct topics with at least one registration, sorted.
    pub async fn topics(&self) -> Vec<String> {
        let state = self.state.lock().await;
        let mut topics: Vec<String> = state.entries.keys().map(|k| k.topic.clone()).collect();
        topics.sort();
        topics.dedup();
        topics
    }

    pub async fn is_closed(&self) -> bool {
        self.state.lock().await.closed
    }

    fn subscribe_locked(
        &self,
        state: &mut RegistryState,
        topic: &str,
        descriptor: EventDescriptor,
    ) -> Result<bool, DomainError> {
        if state.closed {
            return Err(DomainError::new(
                ErrorCode::RegistryClosed,
                "connection closed, subscription rejected",
            )
            .with_detail("client_id", self.client_id.to_string())
            .with_detail("topic", topic));
        }

        if Self::covers(state, topic, &descriptor) {
            return Ok(false);
        }

        let narrower: Vec<SubscriptionKey> = state
            .entries
            .keys()
            .filter(|k| k.topic == topic && descriptor.matches(&k.descriptor))
            .cloned()
            .collect();
        for key in &narrower {
            if let Some(handle) = state.entries.remove(key) {
                self.bus.unsubscribe(&handle);
            }
        }

        let key = SubscriptionKey::new(topic, descriptor);

        let consumer = Consumer::new(
            self.client_id.clone(),
            key.descriptor.clone(),
            Arc::clone(&self.session),
        );
        let handle = self.bus.subscribe(topic, Arc::new(consumer));

        tracing::debug!(
            client_id = %self.client_id,
            topic = %topic,
            rtm_event = %key.descriptor,
            replaced = narrower.len(),
            "Subscribed"
        );
        state.entries.insert(key, handle);
        Ok(true)
    }

    fn covers(state: &RegistryState, topic: &str, descriptor: &EventDescriptor) -> bool {
        state
            .entries
            .keys()
            .any(|k| k.topic == topic && k.descriptor.matches(descriptor))
    }

    fn release_all(&self, state: &mut RegistryState) -> usize {
        let removed = state.entries.len();
        for (_, handle) in state.entries.drain() {
            self.bus.unsubscribe(&handle);
        }
        removed
    }
}

impl Drop for SubscriptionRegistry {
    fn drop(&mut self) {
        let bus = Arc::clone(&self.bus);
        let state = self.state.get_mut();
        for (_, handle) in state.entries.drain() {
            bus.unsubscribe(&handle);
        }
    }
}
