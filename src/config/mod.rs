//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `COURSEWARE_RTM` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use courseware_rtm::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Listening on {:?}", config.server.socket_addr());
//! ```

mod bus;
mod error;
mod redis;
mod server;

pub use bus::{BusBackend, BusConfig};
pub use error::{ConfigError, ValidationError};
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, WebSocket route)
    #[serde(default)]
    pub server: ServerConfig,

    /// Bus configuration (backend, channel prefix)
    #[serde(default)]
    pub bus: BusConfig,

    /// Redis configuration (only read for the redis backend)
    #[serde(default)]
    pub redis: RedisConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `COURSEWARE_RTM` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `COURSEWARE_RTM__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `COURSEWARE_RTM__BUS__BACKEND=redis` -> `bus.backend = redis`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COURSEWARE_RTM")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Redis settings are only checked when the redis backend is selected.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.bus.validate()?;
        if self.bus.backend == BusBackend::Redis {
            self.redis.validate()?;
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 7] = [
        "COURSEWARE_RTM__SERVER__PORT",
        "COURSEWARE_RTM__SERVER__ENVIRONMENT",
        "COURSEWARE_RTM__SERVER__WS_PATH",
        "COURSEWARE_RTM__BUS__BACKEND",
        "COURSEWARE_RTM__BUS__CHANNEL_PREFIX",
        "COURSEWARE_RTM__REDIS__URL",
        "COURSEWARE_RTM__REDIS__RECONNECT_MAX_SECS",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.ws_path, "/ws");
        assert_eq!(config.bus.backend, BusBackend::InMemory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_redis_backend_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("COURSEWARE_RTM__BUS__BACKEND", "redis");
        env::set_var("COURSEWARE_RTM__BUS__CHANNEL_PREFIX", "rtm-staging");
        env::set_var("COURSEWARE_RTM__REDIS__URL", "redis://localhost:6379");
        env::set_var("COURSEWARE_RTM__REDIS__RECONNECT_MAX_SECS", "60");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.bus.backend, BusBackend::Redis);
        assert_eq!(config.bus.channel_prefix, "rtm-staging");
        assert_eq!(config.redis.url, "redis://localhost:6379");
        assert_eq!(config.redis.reconnect_max_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_redis_backend_requires_url() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("COURSEWARE_RTM__BUS__BACKEND", "redis");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("REDIS_URL"))
        );
    }

    #[test]
    fn test_unparseable_value_is_load_error() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("COURSEWARE_RTM__SERVER__PORT", "not-a-port");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_in_memory_backend_ignores_redis() {
        let config = AppConfig {
            redis: RedisConfig {
                url: "http://wrong".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("COURSEWARE_RTM__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_server_port_and_path() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("COURSEWARE_RTM__SERVER__PORT", "3000");
        env::set_var("COURSEWARE_RTM__SERVER__WS_PATH", "/rtm");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.ws_path, "/rtm");
    }
}
