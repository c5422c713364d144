//! Configuration management for the validation engine
//!
//! This module provides configuration structures and validation for
//! the validation engine service.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Validation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationEngineConfig {
    /// Storage configuration
    pub storage: StorageConfig,

    /// API configuration
    pub api: ApiConfig,

    /// Validation configuration
    pub validation: ValidationConfig,

    /// Monitoring configuration
    pub monitoring: MonitoringConfig,
}

impl Default for ValidationEngineConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            api: ApiConfig::default(),
            validation: ValidationConfig::default(),
            monitoring: MonitoringConfig::default(),
        }
    }
}

/// Storage backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendType {
    Memory,
    Postgres,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend type
    pub backend: StorageBackendType,

    /// PostgreSQL specific configuration
    pub postgres: PostgresConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::Memory,
            postgres: PostgresConfig::default(),
        }
    }
}

/// PostgreSQL configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    /// Database URL
    pub url: String,

    /// Connection pool size
    pub pool_size: u32,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost:5432/validation_engine".to_string(),
            pool_size: 10,
        }
    }
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Base path all endpoints are mounted under
    pub base_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8083,
            base_path: "/api/v1".to_string(),
        }
    }
}

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Cache compiled schemas keyed by content fingerprint
    pub enable_schema_cache: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enable_schema_cache: true,
        }
    }
}

/// Monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Log level used when RUST_LOG is unset
    pub log_level: String,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl ValidationEngineConfig {
    /// Load configuration from a file with environment overrides
    pub fn from_file(path: &PathBuf) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("VALIDATION_ENGINE").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from defaults with environment overrides
    pub fn load_with_defaults() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Self::default())?;
        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::Environment::with_prefix("VALIDATION_ENGINE").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api.port == 0 {
            return Err("api.port must be non-zero".to_string());
        }

        if !self.api.base_path.starts_with('/') {
            return Err(format!(
                "api.base_path must start with '/': {}",
                self.api.base_path
            ));
        }

        if self.storage.backend == StorageBackendType::Postgres {
            if self.storage.postgres.url.is_empty() {
                return Err("storage.postgres.url must be set for the postgres backend".to_string());
            }
            if self.storage.postgres.pool_size == 0 {
                return Err("storage.postgres.pool_size must be non-zero".to_string());
            }
        }

        Ok(())
    }

    /// Generate an example configuration file
    pub fn generate_example() -> String {
        r#"# Validation engine configuration

[storage]
# Storage backend: "memory" or "postgres"
backend = "memory"

[storage.postgres]
url = "postgresql://localhost:5432/validation_engine"
pool_size = 10

[api]
host = "0.0.0.0"
port = 8083
base_path = "/api/v1"

[validation]
# Cache compiled JSON Schemas keyed by content fingerprint
enable_schema_cache = true

[monitoring]
# Log level used when RUST_LOG is unset
log_level = "info"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ValidationEngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage.backend, StorageBackendType::Memory);
    }

    #[test]
    fn test_invalid_base_path_rejected() {
        let mut config = ValidationEngineConfig::default();
        config.api.base_path = "api/v1".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_postgres_backend_requires_url() {
        let mut config = ValidationEngineConfig::default();
        config.storage.backend = StorageBackendType::Postgres;
        config.storage.postgres.url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_example_config_parses() {
        let example = ValidationEngineConfig::generate_example();
        let settings = config::Config::builder()
            .add_source(config::File::from_str(&example, config::FileFormat::Toml))
            .build()
            .unwrap();

        let parsed: ValidationEngineConfig = settings.try_deserialize().unwrap();
        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.api.port, 8083);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, ValidationEngineConfig::generate_example()).unwrap();

        let config = ValidationEngineConfig::from_file(&path).unwrap();
        assert!(config.validate().is_ok());
    }
}
