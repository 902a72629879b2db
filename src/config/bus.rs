//! Bus configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Bus configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BusConfig {
    /// Which transport carries consumables
    #[serde(default)]
    pub backend: BusBackend,

    /// Prefix for Redis channel names (`{prefix}:{topic}`)
    #[serde(default = "default_channel_prefix")]
    pub channel_prefix: String,
}

/// Bus transport
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BusBackend {
    /// Single process; no cross-node fanout
    #[default]
    InMemory,
    /// Redis pub/sub across every node sharing the prefix
    Redis,
}

impl BusConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.channel_prefix.is_empty() || self.channel_prefix.contains(char::is_whitespace) {
            return Err(ValidationError::InvalidChannelPrefix);
        }
        Ok(())
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            backend: BusBackend::default(),
            channel_prefix: default_channel_prefix(),
        }
    }
}

fn default_channel_prefix() -> String {
    "rtm".to_string()
}
