//! Storage backends for the validation engine
//!
//! This module provides the rule store abstraction and its
//! implementations. The store owns the rule lifecycle; result linking
//! writes into the externally owned test execution record and owns
//! nothing there.

pub mod memory;
pub mod postgres;


use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{ValidationResult, ValidationRule};
use crate::error::ValidationEngineResult;

/// Rule store trait
///
/// All operations are single-row mutations; concurrent mutations on the
/// same rule id resolve last-writer-wins, nothing requires cross-rule
/// ordering.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Persist a new rule
    async fn create_rule(&self, rule: ValidationRule) -> ValidationEngineResult<ValidationRule>;

    /// Retrieve a rule by id
    async fn get_rule(&self, id: Uuid) -> ValidationEngineResult<Option<ValidationRule>>;

    /// Retrieve all rules scoped to an API specification, oldest first
    async fn get_rules_by_api_spec(
        &self,
        api_spec_id: Uuid,
    ) -> ValidationEngineResult<Vec<ValidationRule>>;

    /// Overwrite an existing rule
    async fn update_rule(&self, rule: ValidationRule) -> ValidationEngineResult<ValidationRule>;

    /// Hard-delete a rule, returns whether it existed
    async fn delete_rule(&self, id: Uuid) -> ValidationEngineResult<bool>;

    /// List all rules, newest first
    async fn list_rules(&self) -> ValidationEngineResult<Vec<ValidationRule>>;

    /// Write a computed result onto an external test execution record
    async fn link_result(
        &self,
        execution_id: Uuid,
        result: &ValidationResult,
    ) -> ValidationEngineResult<()>;

    /// Health check
    async fn health_check(&self) -> ValidationEngineResult<bool>;

    /// Shutdown the storage backend
    async fn shutdown(&self) -> ValidationEngineResult<()>;
}

// Re-export storage implementations
pub use memory::MemoryStorage;
pub use postgres::PostgresStorage;
