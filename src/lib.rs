//! Response validation engine
//!
//! This crate decides whether a captured HTTP response conforms to an
//! expectation (expected status code, JSON Schema, or stored rule) and
//! produces a structured, field-level account of any violations. It also
//! serves as the rule store for named expectations scoped to an API
//! specification.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod storage;
pub mod validator;

// Re-export main types
pub use config::ValidationEngineConfig;
pub use domain::{
    CheckDetails, CheckOutcome, RuleType, Severity, ValidationError, ValidationResult,
    ValidationRule,
};
pub use error::{ValidationEngineError, ValidationEngineResult};
pub use storage::{MemoryStorage, PostgresStorage, RuleStore};
pub use validator::{CustomRuleEvaluator, ResponseValidator, SchemaValidator};

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

/// Validation engine version
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Validation engine service name
pub const ENGINE_NAME: &str = "validation-engine";

/// Initialize the validation engine
pub async fn init_validation_engine(
    config: ValidationEngineConfig,
) -> ValidationEngineResult<ValidationEngine> {
    ValidationEngine::new(config).await
}

/// Shutdown the validation engine
pub async fn shutdown_validation_engine(engine: ValidationEngine) -> ValidationEngineResult<()> {
    engine.shutdown().await
}

/// Response validation engine
///
/// The single entry point external callers use: validates responses and
/// administers the rule store. Validation itself is pure; the only side
/// effect is the optional, best-effort result linking onto an external
/// test execution record.
pub struct ValidationEngine {
    /// Configuration
    config: ValidationEngineConfig,

    /// Rule store backend
    store: Arc<dyn RuleStore>,

    /// Response validator
    validator: ResponseValidator,
}

impl ValidationEngine {
    /// Create a new validation engine with the configured storage backend
    pub async fn new(config: ValidationEngineConfig) -> ValidationEngineResult<Self> {
        config
            .validate()
            .map_err(|e| ValidationEngineError::config(&e))?;

        let store: Arc<dyn RuleStore> = match config.storage.backend {
            config::StorageBackendType::Memory => Arc::new(MemoryStorage::new()?),
            config::StorageBackendType::Postgres => {
                Arc::new(PostgresStorage::new(&config.storage.postgres.url).await?)
            }
        };

        Ok(Self::with_store(config, store))
    }

    /// Create an engine over an existing store
    pub fn with_store(config: ValidationEngineConfig, store: Arc<dyn RuleStore>) -> Self {
        let validator =
            ResponseValidator::with_schema_cache(config.validation.enable_schema_cache);
        Self {
            config,
            store,
            validator,
        }
    }

    /// Register an evaluator for `custom` rules
    pub fn set_custom_evaluator(&mut self, evaluator: Arc<dyn CustomRuleEvaluator>) {
        self.validator.set_custom_evaluator(evaluator);
    }

    /// Validate a response
    ///
    /// Always returns a result; data-level failures (status mismatch,
    /// schema violations, unparsable schema) live inside it, never in a
    /// raised error.
    pub fn validate(
        &self,
        body: &Value,
        actual_status: u16,
        expected_status: Option<u16>,
        schema_text: Option<&str>,
    ) -> ValidationResult {
        self.validator
            .execute(body, actual_status, expected_status, schema_text)
    }

    /// Validate a response and link the result onto a test execution
    ///
    /// When `execution_id` is supplied the computed result is written
    /// onto the externally owned execution record. Linking is
    /// best-effort: a persistence failure is logged and the result is
    /// returned unchanged.
    pub async fn validate_response(
        &self,
        body: &Value,
        actual_status: u16,
        expected_status: Option<u16>,
        schema_text: Option<&str>,
        execution_id: Option<Uuid>,
    ) -> ValidationResult {
        let mut result = self.validate(body, actual_status, expected_status, schema_text);

        if let Some(execution_id) = execution_id {
            result.execution_id = Some(execution_id);
            if let Err(e) = self.store.link_result(execution_id, &result).await {
                tracing::warn!(
                    execution_id = %execution_id,
                    error = %e,
                    "Failed to link validation result to execution record"
                );
            }
        }

        result
    }

    /// Validate a response against a stored rule
    pub async fn validate_with_rule(
        &self,
        rule_id: Uuid,
        body: &Value,
        actual_status: u16,
    ) -> ValidationEngineResult<ValidationResult> {
        let rule = self
            .store
            .get_rule(rule_id)
            .await?
            .ok_or(ValidationEngineError::RuleNotFound(rule_id))?;

        self.validator.execute_rule(&rule, body, actual_status)
    }

    /// Create a rule
    ///
    /// The shape invariant is checked first; storage is never reached
    /// with an invalid rule.
    pub async fn create_rule(
        &self,
        api_spec_id: Uuid,
        rule_type: RuleType,
        rule_definition: Value,
    ) -> ValidationEngineResult<ValidationRule> {
        let rule = ValidationRule::new(api_spec_id, rule_type, rule_definition);
        rule.validate_shape()?;
        self.store.create_rule(rule).await
    }

    /// Fetch a rule by id
    pub async fn get_rule_by_id(&self, id: Uuid) -> ValidationEngineResult<Option<ValidationRule>> {
        self.store.get_rule(id).await
    }

    /// Fetch all rules scoped to an API specification
    pub async fn get_rules_by_api_spec_id(
        &self,
        api_spec_id: Uuid,
    ) -> ValidationEngineResult<Vec<ValidationRule>> {
        self.store.get_rules_by_api_spec(api_spec_id).await
    }

    /// Update a rule, advancing its mutation timestamp
    pub async fn update_rule(
        &self,
        id: Uuid,
        rule_type: RuleType,
        rule_definition: Value,
    ) -> ValidationEngineResult<ValidationRule> {
        let mut rule = self
            .store
            .get_rule(id)
            .await?
            .ok_or(ValidationEngineError::RuleNotFound(id))?;

        rule.rule_type = rule_type;
        rule.rule_definition = rule_definition;
        rule.validate_shape()?;
        rule.touch();

        self.store.update_rule(rule).await
    }

    /// Hard-delete a rule, returns whether it existed
    pub async fn delete_rule(&self, id: Uuid) -> ValidationEngineResult<bool> {
        self.store.delete_rule(id).await
    }

    /// List all rules
    pub async fn list_rules(&self) -> ValidationEngineResult<Vec<ValidationRule>> {
        self.store.list_rules().await
    }

    /// Health check
    pub async fn health_check(&self) -> ValidationEngineResult<bool> {
        self.store.health_check().await
    }

    /// Get the configuration
    pub fn config(&self) -> &ValidationEngineConfig {
        &self.config
    }

    /// Shutdown the engine
    pub async fn shutdown(self) -> ValidationEngineResult<()> {
        self.store.shutdown().await?;

        tracing::info!("Validation engine shutdown completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn memory_engine() -> (ValidationEngine, Arc<MemoryStorage>) {
        let store = Arc::new(MemoryStorage::new().unwrap());
        let engine =
            ValidationEngine::with_store(ValidationEngineConfig::default(), store.clone());
        (engine, store)
    }

    #[tokio::test]
    async fn test_engine_creation() {
        let engine = ValidationEngine::new(ValidationEngineConfig::default()).await;
        assert!(engine.is_ok());
    }

    #[tokio::test]
    async fn test_engine_health_check() {
        let (engine, _) = memory_engine();
        assert!(engine.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_validate_matching_status() {
        let (engine, _) = memory_engine();
        let result = engine.validate(&json!({"ok": true}), 200, Some(200), None);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn test_validate_links_result_to_execution() {
        let (engine, store) = memory_engine();
        let execution_id = Uuid::new_v4();

        let result = engine
            .validate_response(&json!({}), 500, Some(200), None, Some(execution_id))
            .await;

        assert!(!result.is_valid);
        assert_eq!(result.execution_id, Some(execution_id));

        let linked = store.linked_result(execution_id).await.unwrap();
        assert_eq!(linked["is_valid"], json!(false));
    }

    #[tokio::test]
    async fn test_validate_without_execution_does_not_link() {
        let (engine, _) = memory_engine();
        let result = engine
            .validate_response(&json!({}), 200, Some(200), None, None)
            .await;
        assert!(result.execution_id.is_none());
    }

    #[tokio::test]
    async fn test_rule_round_trip() {
        let (engine, _) = memory_engine();
        let api_spec_id = Uuid::new_v4();

        let created = engine
            .create_rule(api_spec_id, RuleType::Status, json!(200))
            .await
            .unwrap();

        let fetched = engine.get_rule_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.rule_type, created.rule_type);
        assert_eq!(fetched.rule_definition, created.rule_definition);
    }

    #[tokio::test]
    async fn test_create_invalid_rule_leaves_store_unchanged() {
        let (engine, store) = memory_engine();

        let error = engine
            .create_rule(Uuid::new_v4(), RuleType::Schema, json!({}))
            .await
            .expect_err("empty definition must be rejected");
        assert!(matches!(error, ValidationEngineError::InvalidRule { .. }));
        assert_eq!(store.rule_count().await, 0);
    }

    #[tokio::test]
    async fn test_update_advances_updated_at() {
        let (engine, _) = memory_engine();

        let created = engine
            .create_rule(Uuid::new_v4(), RuleType::Status, json!(200))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let updated = engine
            .update_rule(created.id, RuleType::Status, json!(404))
            .await
            .unwrap();

        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_rule() {
        let (engine, _) = memory_engine();
        let error = engine
            .update_rule(Uuid::new_v4(), RuleType::Status, json!(200))
            .await
            .expect_err("missing rule");
        assert!(matches!(error, ValidationEngineError::RuleNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_then_fetch_not_found() {
        let (engine, _) = memory_engine();

        let created = engine
            .create_rule(Uuid::new_v4(), RuleType::Status, json!(200))
            .await
            .unwrap();

        assert!(engine.delete_rule(created.id).await.unwrap());
        assert!(engine.get_rule_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_validate_with_stored_rule() {
        let (engine, _) = memory_engine();

        let rule = engine
            .create_rule(
                Uuid::new_v4(),
                RuleType::Schema,
                json!({"type": "object", "required": ["name"]}),
            )
            .await
            .unwrap();

        let result = engine
            .validate_with_rule(rule.id, &json!({"name": "x"}), 200)
            .await
            .unwrap();
        assert!(result.is_valid);

        let result = engine
            .validate_with_rule(rule.id, &json!({}), 200)
            .await
            .unwrap();
        assert!(!result.is_valid);
    }
}
