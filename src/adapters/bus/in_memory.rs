//! In-memory bus implementation.
//!
//! Delivers inline on the publisher's task, in listener registration order.
//! Suitable for single-process deployments and for deterministic tests.
//! Lock poisoning is recovered from rather than propagated: the guarded maps
//! stay consistent because no listener code runs while a lock is held.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::foundation::DomainError;
use crate::domain::rtm::Consumable;
use crate::ports::{Bus, BusListener, ListenerHandle};

type Registration = (ListenerHandle, Arc<dyn BusListener>);

/// In-process publish/subscribe bus.
///
/// Features:
/// - Inline, ordered delivery (deterministic for tests)
/// - Per-listener error isolation
/// - Optional capture of published consumables for assertions
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryBus::with_recording());
///
/// bus.publish(consumable.topic(), consumable.clone()).await?;
///
/// assert_eq!(bus.published_on(consumable.topic()).len(), 1);
/// ```
pub struct InMemoryBus {
    listeners: RwLock<HashMap<String, Vec<Registration>>>,
    published: Option<RwLock<Vec<Consumable>>>,
}

impl InMemoryBus {
    /// Creates a bus that does not retain published consumables.
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            published: None,
        }
    }

    /// Creates a bus that keeps every published consumable for inspection.
    pub fn with_recording() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            published: Some(RwLock::new(Vec::new())),
        }
    }

    fn read_listeners(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<Registration>>> {
        self.listeners.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_listeners(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<Registration>>> {
        self.listeners.write().unwrap_or_else(|e| e.into_inner())
    }

    // === Inspection Helpers ===

    /// Number of listeners currently registered on `topic`.
    pub fn listener_count(&self, topic: &str) -> usize {
        self.read_listeners().get(topic).map(Vec::len).unwrap_or(0)
    }

    /// Number of topics with at least one listener.
    pub fn topic_count(&self) -> usize {
        self.read_listeners().len()
    }

    /// All recorded consumables, oldest first. Empty unless recording.
    pub fn published_events(&self) -> Vec<Consumable> {
        match &self.published {
            Some(published) => published.read().unwrap_or_else(|e| e.into_inner()).clone(),
            None => Vec::new(),
        }
    }

    /// Recorded consumables for one topic.
    pub fn published_on(&self, topic: &str) -> Vec<Consumable> {
        self.published_events()
            .into_iter()
            .filter(|c| c.topic() == topic)
            .collect()
    }

    /// Clears recorded consumables (for test isolation).
    pub fn clear(&self) {
        if let Some(published) = &self.published {
            published.write().unwrap_or_else(|e| e.into_inner()).clear();
        }
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bus for InMemoryBus {
    async fn publish(&self, topic: &str, consumable: Consumable) -> Result<(), DomainError> {
        if let Some(published) = &self.published {
            published
                .write()
                .unwrap_or_else(|e| e.into_inner())
                .push(consumable.clone());
        }

        // Clone listeners to release lock before await points
        let topic_listeners: Vec<Arc<dyn BusListener>> = self
            .read_listeners()
            .get(topic)
            .map(|regs| regs.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default();

        for listener in topic_listeners {
            if let Err(e) = listener.on_message(&consumable).await {
                tracing::warn!(
                    listener = listener.name(),
                    topic = %topic,
                    instance = %consumable.instance_name(),
                    error = %e,
                    "Listener failed, continuing delivery"
                );
            }
        }

        Ok(())
    }

    fn subscribe(&self, topic: &str, listener: Arc<dyn BusListener>) -> ListenerHandle {
        let handle = ListenerHandle::new(topic);
        self.write_listeners()
            .entry(topic.to_string())
            .or_default()
            .push((handle.clone(), listener));
        handle
    }

    fn unsubscribe(&self, handle: &ListenerHandle) -> bool {
        let mut listeners = self.write_listeners();
        let Some(registrations) = listeners.get_mut(handle.topic()) else {
            return false;
        };

        let before = registrations.len();
        registrations.retain(|(h, _)| h != handle);
        let removed = registrations.len() != before;

        if registrations.is_empty() {
            listeners.remove(handle.topic());
        }
        removed
    }
}
