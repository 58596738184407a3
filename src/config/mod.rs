//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `DIGITAL_TWIN` prefix
//! and nested values are separated by `__`.
//!
//! # Example
//!
//! ```no_run
//! use digital_twin::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! config.logging.init().expect("Failed to initialize logging");
//! ```

mod database;
mod engine;
mod error;
mod logging;

pub use database::{DatabaseConfig, PoolSettings};
pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};

use serde::Deserialize;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection; leave the URL unset to use the in-memory store
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Detection and selection thresholds
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DIGITAL_TWIN` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `DIGITAL_TWIN__DATABASE__URL=...` -> `database.url = ...`
    /// - `DIGITAL_TWIN__DATABASE__POOL__MAX_CONNECTIONS=20`
    /// - `DIGITAL_TWIN__ENGINE__DETECTION__SYNERGY_THRESHOLD=0.75`
    /// - `DIGITAL_TWIN__LOGGING__FORMAT=json`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DIGITAL_TWIN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// The database section is only checked when a URL is configured.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.database.is_configured() {
            self.database.validate()?;
        }
        self.engine.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "DIGITAL_TWIN__DATABASE__URL",
        "DIGITAL_TWIN__DATABASE__POOL__MAX_CONNECTIONS",
        "DIGITAL_TWIN__ENGINE__DETECTION__SYNERGY_THRESHOLD",
        "DIGITAL_TWIN__ENGINE__SELECTION__DEFAULT_LIMIT",
        "DIGITAL_TWIN__LOGGING__FORMAT",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn loads_defaults_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert!(!config.database.is_configured());
        assert_eq!(config.engine.detection.min_evidence, 3);
        assert_eq!(config.engine.selection.default_limit, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_overrides_apply() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("DIGITAL_TWIN__DATABASE__URL", "postgres://twin@localhost/twin");
        env::set_var("DIGITAL_TWIN__DATABASE__POOL__MAX_CONNECTIONS", "25");
        env::set_var("DIGITAL_TWIN__ENGINE__DETECTION__SYNERGY_THRESHOLD", "0.75");
        env::set_var("DIGITAL_TWIN__ENGINE__SELECTION__DEFAULT_LIMIT", "20");
        env::set_var("DIGITAL_TWIN__LOGGING__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://twin@localhost/twin")
        );
        assert_eq!(config.database.pool.max_connections, 25);
        assert_eq!(config.engine.detection.synergy_threshold, 0.75);
        assert_eq!(config.engine.selection.default_limit, 20);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }
}
