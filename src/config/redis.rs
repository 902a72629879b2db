//! Redis settings for the pub/sub bus backend

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Connection settings for [`RedisBus`](crate::adapters::bus::RedisBus).
///
/// Only read when `bus.backend = redis`.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// `redis://` or `rediss://` URL of the pub/sub server
    #[serde(default)]
    pub url: String,

    /// Startup budget for opening the publish connection and pattern subscription
    #[serde(default = "default_connect_timeout")]
    pub timeout_secs: u64,

    /// Upper bound on the relay's resubscribe backoff
    #[serde(default = "default_reconnect_max")]
    pub reconnect_max_secs: u64,
}

impl RedisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn reconnect_max(&self) -> Duration {
        Duration::from_secs(self.reconnect_max_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("REDIS_URL"));
        }
        if !self.url.starts_with("redis://") && !self.url.starts_with("rediss://") {
            return Err(ValidationError::InvalidRedisUrl);
        }
        if self.timeout_secs == 0 || self.reconnect_max_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: default_connect_timeout(),
            reconnect_max_secs: default_reconnect_max(),
        }
    }
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_reconnect_max() -> u64 {
    30
}
