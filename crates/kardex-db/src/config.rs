//! Storage configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults, once, at startup. The chosen backend is then passed explicitly
//! to [`open_store`](crate::store::open_store); nothing reads the environment
//! after that.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::pool::DbConfig;

/// Which [`InventoryStore`](crate::store::InventoryStore) implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// SQLite file through sqlx.
    #[default]
    Sqlite,
    /// Process-local maps; nothing survives a restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::InvalidValue("KARDEX_STORE".to_string())),
        }
    }
}

/// Store configuration: backend plus the SQLite settings it may need.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub db: DbConfig,
}

impl StoreConfig {
    pub fn new(backend: StoreBackend, db: DbConfig) -> Self {
        StoreConfig { backend, db }
    }

    /// In-memory backend (for tests and demos).
    pub fn memory() -> Self {
        StoreConfig {
            backend: StoreBackend::Memory,
            db: DbConfig::in_memory(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `KARDEX_STORE`: `sqlite` (default) or `memory`
    /// - plus everything [`DbConfig::from_env`] reads
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = match env::var("KARDEX_STORE") {
            Ok(value) => value.parse()?,
            Err(_) => StoreBackend::default(),
        };

        Ok(StoreConfig {
            backend,
            db: DbConfig::from_env()?,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!("sqlite".parse::<StoreBackend>().unwrap(), StoreBackend::Sqlite);
        assert_eq!(" Memory ".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("mssql".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_memory_config() {
        let config = StoreConfig::memory();
        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.db.max_connections, 1);
    }
}
