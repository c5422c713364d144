//! Response validation
//!
//! This module composes the status and schema checks into one pass/fail
//! verdict with an aggregated error list. `execute` is the sole entry
//! point callers use to validate a response: it never returns an error,
//! any internal failure surfaces as a data-level entry inside the
//! returned result.

pub mod custom;
pub mod schema;
pub mod status;

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{CheckOutcome, RuleType, ValidationResult, ValidationRule};
use crate::error::{ValidationEngineError, ValidationEngineResult};

pub use custom::CustomRuleEvaluator;
pub use schema::{SchemaCheck, SchemaValidator};
pub use status::StatusCheck;

/// Response validator
///
/// Runs the status check, then the schema check, concatenating their
/// error contributions in that order. Invocations share no mutable state
/// beyond the schema cache and are safe to run in parallel.
pub struct ResponseValidator {
    /// Schema validator with its parsed-schema cache
    schema: SchemaValidator,

    /// Registered evaluator for `custom` rules, if any
    custom_evaluator: Option<Arc<dyn CustomRuleEvaluator>>,
}

impl ResponseValidator {
    /// Create a new response validator
    pub fn new() -> Self {
        Self {
            schema: SchemaValidator::new(),
            custom_evaluator: None,
        }
    }

    /// Create a validator with explicit schema cache behavior
    pub fn with_schema_cache(cache_enabled: bool) -> Self {
        Self {
            schema: SchemaValidator::with_cache(cache_enabled),
            custom_evaluator: None,
        }
    }

    /// Register an evaluator for `custom` rules
    pub fn set_custom_evaluator(&mut self, evaluator: Arc<dyn CustomRuleEvaluator>) {
        self.custom_evaluator = Some(evaluator);
    }

    /// Validate a response against an optional expected status and schema
    pub fn execute(
        &self,
        body: &Value,
        actual_status: u16,
        expected_status: Option<u16>,
        schema_text: Option<&str>,
    ) -> ValidationResult {
        let mut result = ValidationResult::new();

        match status::check(actual_status, expected_status) {
            StatusCheck::Skipped => {}
            StatusCheck::Passed => {
                result.details.status_check = CheckOutcome::Passed;
            }
            StatusCheck::Mismatch(error) => {
                result.details.status_check = CheckOutcome::Failed;
                result.record_error(error);
            }
        }

        match self.schema.check(body, schema_text) {
            SchemaCheck::Skipped => {}
            SchemaCheck::Passed => {
                result.details.schema_check = CheckOutcome::Passed;
            }
            SchemaCheck::Violations(errors) => {
                result.details.schema_check = CheckOutcome::Failed;
                result.record_errors(errors);
            }
            SchemaCheck::Rejected(error) => {
                result.details.schema_check = CheckOutcome::Failed;
                result.record_error(error);
            }
        }

        result
    }

    /// Validate a response against a stored rule
    ///
    /// `status` and `schema` rules delegate to `execute`; `custom` rules
    /// require a registered evaluator and are rejected otherwise.
    pub fn execute_rule(
        &self,
        rule: &ValidationRule,
        body: &Value,
        actual_status: u16,
    ) -> ValidationEngineResult<ValidationResult> {
        match rule.rule_type {
            RuleType::Status => {
                let expected = rule.expected_status().ok_or_else(|| {
                    ValidationEngineError::invalid_rule(
                        "status rule definition must be an HTTP status code (100-599)",
                    )
                })?;
                Ok(self.execute(body, actual_status, Some(expected), None))
            }
            RuleType::Schema => {
                let schema_text = serde_json::to_string(&rule.rule_definition)?;
                Ok(self.execute(body, actual_status, None, Some(&schema_text)))
            }
            RuleType::Custom => {
                let Some(evaluator) = &self.custom_evaluator else {
                    return Err(ValidationEngineError::unsupported(
                        "no evaluator registered for custom rules",
                    ));
                };
                let mut result = ValidationResult::new();
                result.record_errors(evaluator.evaluate(body, &rule.rule_definition));
                Ok(result)
            }
        }
    }
}

impl Default for ResponseValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Severity;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_matching_status_without_schema() {
        let validator = ResponseValidator::new();
        let result = validator.execute(&json!({"ok": true}), 200, Some(200), None);

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.details.status_check, CheckOutcome::Passed);
        assert_eq!(result.details.schema_check, CheckOutcome::Skipped);
    }

    #[test]
    fn test_status_mismatch() {
        let validator = ResponseValidator::new();
        let result = validator.execute(&json!({}), 404, Some(200), None);

        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "status_code");
        assert_eq!(result.errors[0].message, "Expected status code 200, got 404");
        assert_eq!(result.details.status_check, CheckOutcome::Failed);
    }

    #[test]
    fn test_schema_violation_references_field() {
        let validator = ResponseValidator::new();
        let schema = r#"{"type": "object", "properties": {"name": {"type": "string"}}}"#;
        let result = validator.execute(&json!({"name": 123}), 200, None, Some(schema));

        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "name");
        assert_eq!(result.errors[0].severity, Severity::Error);
        assert_eq!(result.details.status_check, CheckOutcome::Skipped);
        assert_eq!(result.details.schema_check, CheckOutcome::Failed);
    }

    #[test]
    fn test_malformed_schema_returns_result() {
        let validator = ResponseValidator::new();
        let result = validator.execute(&json!({}), 200, None, Some("not a schema"));

        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "validation");
    }

    #[test]
    fn test_status_errors_precede_schema_errors() {
        let validator = ResponseValidator::new();
        let schema = r#"{"type": "object", "required": ["id"]}"#;
        let result = validator.execute(&json!({}), 500, Some(200), Some(schema));

        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].field, "status_code");
        assert_ne!(result.errors[1].field, "status_code");
    }

    #[test]
    fn test_validity_independent_of_status_when_unexpected() {
        let validator = ResponseValidator::new();
        for status in [200u16, 404, 500] {
            let result = validator.execute(&json!({}), status, None, None);
            assert!(result.is_valid);
        }
    }

    #[test]
    fn test_status_rule_execution() {
        let validator = ResponseValidator::new();
        let rule = ValidationRule::new(Uuid::new_v4(), RuleType::Status, json!(200));

        let result = validator.execute_rule(&rule, &json!({}), 200).unwrap();
        assert!(result.is_valid);

        let result = validator.execute_rule(&rule, &json!({}), 500).unwrap();
        assert!(!result.is_valid);
    }

    #[test]
    fn test_schema_rule_execution() {
        let validator = ResponseValidator::new();
        let rule = ValidationRule::new(
            Uuid::new_v4(),
            RuleType::Schema,
            json!({"type": "object", "required": ["name"]}),
        );

        let result = validator
            .execute_rule(&rule, &json!({"name": "x"}), 200)
            .unwrap();
        assert!(result.is_valid);
    }

    #[test]
    fn test_custom_rule_without_evaluator_is_rejected() {
        let validator = ResponseValidator::new();
        let rule = ValidationRule::new(Uuid::new_v4(), RuleType::Custom, json!({"check": "x"}));

        let error = validator
            .execute_rule(&rule, &json!({}), 200)
            .expect_err("custom rules need an evaluator");
        assert!(matches!(error, ValidationEngineError::Unsupported { .. }));
    }

    struct RejectAll;

    impl CustomRuleEvaluator for RejectAll {
        fn evaluate(&self, _body: &Value, _definition: &Value) -> Vec<crate::domain::ValidationError> {
            vec![crate::domain::ValidationError::error(
                "$",
                "rejected".to_string(),
            )]
        }
    }

    #[test]
    fn test_custom_rule_with_evaluator() {
        let mut validator = ResponseValidator::new();
        validator.set_custom_evaluator(Arc::new(RejectAll));
        let rule = ValidationRule::new(Uuid::new_v4(), RuleType::Custom, json!({"check": "x"}));

        let result = validator.execute_rule(&rule, &json!({}), 200).unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].field, "$");
    }
}
