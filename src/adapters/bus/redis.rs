//! Redis-backed bus for multi-process deployments.
//!
//! Every process publishes consumables as JSON on `{prefix}:{topic}` and
//! relays everything matching `{prefix}:*` into its own [`InMemoryBus`], which
//! owns the local listener table. A consumable published on one node thus
//! reaches listeners on every node, including the publishing one.
//!
//! If the pattern subscription drops, the relay resubscribes with capped
//! exponential backoff. Frames published while it is down are not replayed.

use async_trait::async_trait;
use futures::StreamExt;
use redis::aio::{MultiplexedConnection, PubSub};
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::rtm::Consumable;
use crate::ports::{Bus, BusListener, ListenerHandle};

use super::in_memory::InMemoryBus;

/// Bus that fans out across processes through Redis pub/sub.
///
/// Ordering within a topic holds per publishing node: Redis delivers one
/// connection's publishes in order and the relay dispatches sequentially.
pub struct RedisBus {
    conn: MultiplexedConnection,
    prefix: String,
    local: Arc<InMemoryBus>,
    relay: JoinHandle<()>,
}

impl RedisBus {
    /// Connects both the publishing connection and the pattern subscription.
    ///
    /// `max_backoff` caps the delay between relay resubscribe attempts.
    pub async fn connect(
        client: redis::Client,
        prefix: impl Into<String>,
        max_backoff: Duration,
    ) -> Result<Self, DomainError> {
        let prefix = prefix.into();

        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(unavailable)?;
        let pubsub = open_pubsub(&client, &prefix).await?;

        let local = Arc::new(InMemoryBus::new());
        let relay = tokio::spawn(relay(
            client,
            pubsub,
            prefix.clone(),
            Arc::clone(&local),
            max_backoff,
        ));

        tracing::info!(pattern = %channel_pattern(&prefix), "Redis bus connected");

        Ok(Self {
            conn,
            prefix,
            local,
            relay,
        })
    }

    /// Listener registrations on this node for `topic`.
    pub fn listener_count(&self, topic: &str) -> usize {
        self.local.listener_count(topic)
    }
}

impl Drop for RedisBus {
    fn drop(&mut self) {
        self.relay.abort();
    }
}

#[async_trait]
impl Bus for RedisBus {
    async fn publish(&self, topic: &str, consumable: Consumable) -> Result<(), DomainError> {
        let frame = serde_json::to_string(&consumable)?;
        let channel = channel_name(&self.prefix, topic);

        let mut conn = self.conn.clone();
        let receivers: i64 = conn
            .publish(&channel, frame)
            .await
            .map_err(unavailable)?;

        tracing::trace!(channel = %channel, receivers, "Published to Redis");
        Ok(())
    }

    fn subscribe(&self, topic: &str, listener: Arc<dyn BusListener>) -> ListenerHandle {
        self.local.subscribe(topic, listener)
    }

    fn unsubscribe(&self, handle: &ListenerHandle) -> bool {
        self.local.unsubscribe(handle)
    }
}

async fn relay(
    client: redis::Client,
    mut pubsub: PubSub,
    prefix: String,
    local: Arc<InMemoryBus>,
    max_backoff: Duration,
) {
    loop {
        dispatch(pubsub, &prefix, &local).await;
        tracing::warn!(prefix = %prefix, "Redis relay stream ended, resubscribing");
        pubsub = resubscribe(&client, &prefix, max_backoff).await;
    }
}

async fn dispatch(pubsub: PubSub, prefix: &str, local: &InMemoryBus) {
    let mut messages = pubsub.into_on_message();

    while let Some(msg) = messages.next().await {
        let payload: String = match msg.get_payload() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(channel = %msg.get_channel_name(), error = %e, "Skipping non-text frame");
                continue;
            }
        };

        match decode_frame(prefix, msg.get_channel_name(), &payload) {
            Ok((topic, consumable)) => {
                // Local dispatch isolates listener failures and never errors
                let _ = local.publish(&topic, consumable).await;
            }
            Err(e) => {
                tracing::warn!(channel = %msg.get_channel_name(), error = %e, "Skipping malformed frame");
            }
        }
    }
}

async fn resubscribe(client: &redis::Client, prefix: &str, max_backoff: Duration) -> PubSub {
    let mut attempt = 0u32;
    loop {
        tokio::time::sleep(reconnect_delay(attempt, max_backoff)).await;
        match open_pubsub(client, prefix).await {
            Ok(pubsub) => {
                tracing::info!(prefix = %prefix, attempt, "Redis relay resubscribed");
                return pubsub;
            }
            Err(e) => {
                tracing::warn!(prefix = %prefix, attempt, error = %e, "Redis relay resubscribe failed");
                attempt = attempt.saturating_add(1);
            }
        }
    }
}

async fn open_pubsub(client: &redis::Client, prefix: &str) -> Result<PubSub, DomainError> {
    let mut pubsub = client
        .get_async_connection()
        .await
        .map_err(unavailable)?
        .into_pubsub();
    pubsub
        .psubscribe(channel_pattern(prefix))
        .await
        .map_err(unavailable)?;
    Ok(pubsub)
}

const RECONNECT_BASE_DELAY: Duration = Duration::from_millis(100);

/// Delay before resubscribe attempt `attempt` (zero-based): doubles from
/// 100ms and never exceeds `max`.
pub fn reconnect_delay(attempt: u32, max: Duration) -> Duration {
    RECONNECT_BASE_DELAY
        .saturating_mul(1u32 << attempt.min(16))
        .min(max)
}

fn unavailable(e: redis::RedisError) -> DomainError {
    DomainError::new(ErrorCode::BusUnavailable, e.to_string())
}

/// Redis channel carrying one topic.
pub fn channel_name(prefix: &str, topic: &str) -> String {
    format!("{prefix}:{topic}")
}

/// Pattern matching every topic under `prefix`.
pub fn channel_pattern(prefix: &str) -> String {
    format!("{prefix}:*")
}

/// Parses one relayed frame into its topic and consumable.
///
/// Rejects channels outside `prefix` and frames whose embedded topic
/// disagrees with the channel.
pub fn decode_frame(
    prefix: &str,
    channel: &str,
    payload: &str,
) -> Result<(String, Consumable), DomainError> {
    let topic = channel
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix(':'))
        .filter(|topic| !topic.is_empty())
        .ok_or_else(|| {
            DomainError::invalid_argument("channel", "channel is outside the bus prefix")
                .with_detail("channel", channel)
        })?;

    let consumable: Consumable = serde_json::from_str(payload)?;
    if consumable.topic() != topic {
        return Err(
            DomainError::invalid_argument("channel", "frame topic does not match channel")
                .with_detail("channel", channel)
                .with_detail("topic", consumable.topic()),
        );
    }

    Ok((topic.to_string(), consumable))
}
