//! API request structures

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::RuleType;

/// Validate response request
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateRequest {
    /// Captured response body
    pub response: Value,

    /// Actual status code
    pub status_code: u16,

    /// JSON Schema text to validate the body against
    #[serde(default)]
    pub json_schema: Option<String>,

    /// Expected status code
    #[serde(default)]
    pub expected_status_code: Option<u16>,

    /// Test execution to link the result onto
    #[serde(default)]
    pub execution_id: Option<Uuid>,
}

/// Create rule request
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRuleRequest {
    /// API specification the rule is scoped to
    pub api_spec_id: Uuid,

    /// Rule type tag
    pub rule_type: RuleType,

    /// Rule payload
    pub rule_definition: Value,
}

/// Update rule request
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRuleRequest {
    /// Rule type tag
    pub rule_type: RuleType,

    /// Rule payload
    pub rule_definition: Value,
}

/// Rule listing filter
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListRulesQuery {
    /// Restrict the listing to one API specification
    #[serde(default)]
    pub api_spec_id: Option<Uuid>,
}
