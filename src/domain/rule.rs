//! Validation rule entity
//!
//! A rule is a named, reusable expectation scoped to an API specification.
//! The `api_spec_id` is an opaque foreign key owned by the specification
//! registry; the engine never dereferences it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ValidationEngineError, ValidationEngineResult};

/// Rule type tag
///
/// A closed set: `status` carries an expected status code, `schema` a
/// JSON Schema document, `custom` an opaque payload evaluated through a
/// registered evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Status,
    Schema,
    Custom,
}

impl RuleType {
    /// Tag as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Schema => "schema",
            Self::Custom => "custom",
        }
    }

    /// Parse a stored tag
    pub fn parse(tag: &str) -> ValidationEngineResult<Self> {
        match tag {
            "status" => Ok(Self::Status),
            "schema" => Ok(Self::Schema),
            "custom" => Ok(Self::Custom),
            other => Err(ValidationEngineError::storage(&format!(
                "unknown rule type tag: {}",
                other
            ))),
        }
    }
}

/// Stored validation rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Unique rule identifier
    pub id: Uuid,

    /// API specification this rule is scoped to (opaque foreign key)
    pub api_spec_id: Uuid,

    /// Rule type tag
    pub rule_type: RuleType,

    /// Rule payload, shape depends on the tag
    pub rule_definition: Value,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modified timestamp, advances on every mutation
    pub updated_at: DateTime<Utc>,
}

impl ValidationRule {
    /// Create a new rule
    pub fn new(api_spec_id: Uuid, rule_type: RuleType, rule_definition: Value) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            api_spec_id,
            rule_type,
            rule_definition,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check the shape invariant
    ///
    /// The definition must be non-empty and must match the payload shape
    /// of the rule's tag. Called before every create and update; storage
    /// is never reached with an invalid rule.
    pub fn validate_shape(&self) -> ValidationEngineResult<()> {
        if definition_is_empty(&self.rule_definition) {
            return Err(ValidationEngineError::invalid_rule(
                "rule definition must be non-empty",
            ));
        }

        match self.rule_type {
            RuleType::Status => {
                self.expected_status().ok_or_else(|| {
                    ValidationEngineError::invalid_rule(
                        "status rule definition must be an HTTP status code (100-599)",
                    )
                })?;
            }
            RuleType::Schema => {
                jsonschema::validator_for(&self.rule_definition).map_err(|e| {
                    ValidationEngineError::invalid_rule(&format!(
                        "schema rule definition is not a valid JSON Schema: {}",
                        e
                    ))
                })?;
            }
            RuleType::Custom => {
                // Opaque payload, only the non-empty check applies.
            }
        }

        Ok(())
    }

    /// Extract the expected status code from a `status` rule payload
    ///
    /// Accepts a bare integer or `{"expected_status": <code>}`.
    pub fn expected_status(&self) -> Option<u16> {
        let raw = match &self.rule_definition {
            Value::Number(n) => n.as_u64(),
            Value::Object(map) => map.get("expected_status").and_then(Value::as_u64),
            _ => None,
        }?;
        let code = u16::try_from(raw).ok()?;
        (100..=599).contains(&code).then_some(code)
    }

    /// Advance the mutation timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Whether a rule payload counts as empty
fn definition_is_empty(definition: &Value) -> bool {
    match definition {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_type_round_trip() {
        for tag in [RuleType::Status, RuleType::Schema, RuleType::Custom] {
            assert_eq!(RuleType::parse(tag.as_str()).unwrap(), tag);
        }
        assert!(RuleType::parse("regex").is_err());
    }

    #[test]
    fn test_status_rule_shape() {
        let rule = ValidationRule::new(Uuid::new_v4(), RuleType::Status, json!(200));
        assert!(rule.validate_shape().is_ok());
        assert_eq!(rule.expected_status(), Some(200));

        let rule = ValidationRule::new(
            Uuid::new_v4(),
            RuleType::Status,
            json!({"expected_status": 404}),
        );
        assert!(rule.validate_shape().is_ok());
        assert_eq!(rule.expected_status(), Some(404));

        let rule = ValidationRule::new(Uuid::new_v4(), RuleType::Status, json!(9000));
        assert!(rule.validate_shape().is_err());
    }

    #[test]
    fn test_empty_definition_rejected() {
        for empty in [json!(null), json!(""), json!({}), json!([])] {
            let rule = ValidationRule::new(Uuid::new_v4(), RuleType::Custom, empty);
            assert!(rule.validate_shape().is_err());
        }
    }

    #[test]
    fn test_schema_rule_shape() {
        let rule = ValidationRule::new(
            Uuid::new_v4(),
            RuleType::Schema,
            json!({"type": "object", "properties": {"name": {"type": "string"}}}),
        );
        assert!(rule.validate_shape().is_ok());

        let rule = ValidationRule::new(Uuid::new_v4(), RuleType::Schema, json!({"type": 123}));
        assert!(rule.validate_shape().is_err());
    }

    #[test]
    fn test_touch_advances_updated_at() {
        let mut rule = ValidationRule::new(Uuid::new_v4(), RuleType::Status, json!(200));
        let before = rule.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(2));
        rule.touch();
        assert!(rule.updated_at > before);
        assert_eq!(rule.created_at, before);
    }
}
