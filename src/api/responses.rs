//! API response structures

use serde::{Deserialize, Serialize};

use crate::domain::ValidationRule;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,

    /// Service name
    pub service: String,

    /// Response timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// List rules response
#[derive(Debug, Serialize, Deserialize)]
pub struct ListRulesResponse {
    /// Rules
    pub rules: Vec<ValidationRule>,

    /// Total count
    pub count: usize,
}

/// Delete rule response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteRuleResponse {
    /// Response message
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type
    pub error: String,

    /// Error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}
