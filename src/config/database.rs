//! Database configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_POOL_SIZE: u32 = 100;

/// PostgreSQL settings. Without a `url` the engine runs on the in-memory store.
///
/// - `DIGITAL_TWIN__DATABASE__URL=postgres://twin@localhost/twin`
/// - `DIGITAL_TWIN__DATABASE__POOL__MAX_CONNECTIONS=20`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub pool: PoolSettings,

    /// Apply `migrations/` when the pool is opened
    #[serde(default)]
    pub run_migrations: bool,
}

/// Connection pool sizing and lifetimes, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            min_connections: 1,
            max_connections: 10,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }
}

impl PoolSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections == 0 || self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn is_configured(&self) -> bool {
        self.url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// The connection URL.
    ///
    /// # Errors
    ///
    /// `MissingRequired` when no URL is configured.
    pub fn connection_url(&self) -> Result<&str, ValidationError> {
        match self.url.as_deref() {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(ValidationError::MissingRequired("DATABASE__URL")),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let url = self.connection_url()?;
        let scheme = url.split_once("://").map(|(scheme, _)| scheme);
        if !matches!(scheme, Some("postgres" | "postgresql")) {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        self.pool.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn unconfigured_by_default() {
        let config = DatabaseConfig::default();
        assert!(!config.is_configured());
        assert!(!config.run_migrations);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
        assert!(!configured("").is_configured());
    }

    #[test]
    fn pool_durations() {
        let pool = PoolSettings::default();
        assert_eq!(pool.acquire_timeout(), Duration::from_secs(30));
        assert_eq!(pool.idle_timeout(), Duration::from_secs(600));
        assert_eq!(pool.max_lifetime(), Duration::from_secs(1800));
    }

    #[test]
    fn only_postgres_schemes_pass() {
        assert!(configured("postgres://twin@localhost/twin").validate().is_ok());
        assert!(configured("postgresql://twin@localhost/twin").validate().is_ok());
        assert!(matches!(
            configured("sqlite://twin.db").validate(),
            Err(ValidationError::InvalidDatabaseUrl)
        ));
        assert!(matches!(
            configured("localhost/twin").validate(),
            Err(ValidationError::InvalidDatabaseUrl)
        ));
    }

    #[test]
    fn pool_bounds_are_checked() {
        let mut config = configured("postgres://localhost/twin");
        config.pool.min_connections = 20;
        config.pool.max_connections = 5;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidPoolSize)));

        config.pool.min_connections = 0;
        config.pool.max_connections = 500;
        assert!(matches!(config.validate(), Err(ValidationError::PoolSizeTooLarge)));
    }
}
