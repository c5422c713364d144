//! Error handling for the validation engine
//!
//! This module provides error types and result aliases for the engine.
//! Data-level validation outcomes (status mismatches, schema violations,
//! unparsable schemas) are never expressed through these types; they live
//! inside `ValidationResult`. The variants here cover rule management and
//! infrastructure failures only.

use thiserror::Error;
use uuid::Uuid;

/// Result type for validation engine operations
pub type ValidationEngineResult<T> = Result<T, ValidationEngineError>;

/// Validation engine error types
#[derive(Error, Debug)]
pub enum ValidationEngineError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Storage error
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Invalid rule shape
    #[error("Invalid validation rule: {message}")]
    InvalidRule { message: String },

    /// Rule not found
    #[error("Rule not found: {0}")]
    RuleNotFound(Uuid),

    /// Serialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Unsupported operation
    #[error("Unsupported: {message}")]
    Unsupported { message: String },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ValidationEngineError {
    /// Create a configuration error
    pub fn config(message: &str) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    /// Create a storage error
    pub fn storage(message: &str) -> Self {
        Self::Storage {
            message: message.to_string(),
        }
    }

    /// Create an invalid rule error
    pub fn invalid_rule(message: &str) -> Self {
        Self::InvalidRule {
            message: message.to_string(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: &str) -> Self {
        Self::Serialization {
            message: message.to_string(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported(message: &str) -> Self {
        Self::Unsupported {
            message: message.to_string(),
        }
    }

    /// Create an internal error
    pub fn internal(message: &str) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    /// Get the error code for HTTP responses
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Config { .. } => 400,
            Self::InvalidRule { .. } => 400,
            Self::Unsupported { .. } => 400,
            Self::RuleNotFound(_) => 404,
            Self::Storage { .. } => 500,
            Self::Serialization { .. } => 500,
            Self::Internal { .. } => 500,
        }
    }
}

impl From<std::io::Error> for ValidationEngineError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ValidationEngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for ValidationEngineError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}

impl From<sqlx::Error> for ValidationEngineError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage {
            message: err.to_string(),
        }
    }
}
