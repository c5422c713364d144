//! In-memory storage implementation

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{ValidationResult, ValidationRule};
use crate::error::{ValidationEngineError, ValidationEngineResult};
use crate::storage::RuleStore;

/// In-memory storage implementation
pub struct MemoryStorage {
    /// Rule storage
    rules: Arc<RwLock<HashMap<Uuid, ValidationRule>>>,

    /// Serialized results linked onto execution records, stands in for
    /// the externally owned test execution store
    linked_results: Arc<RwLock<HashMap<Uuid, Value>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> ValidationEngineResult<Self> {
        Ok(Self {
            rules: Arc::new(RwLock::new(HashMap::new())),
            linked_results: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Fetch the result linked onto an execution record, if any
    pub async fn linked_result(&self, execution_id: Uuid) -> Option<Value> {
        let linked = self.linked_results.read().await;
        linked.get(&execution_id).cloned()
    }

    /// Number of stored rules
    pub async fn rule_count(&self) -> usize {
        self.rules.read().await.len()
    }
}

#[async_trait]
impl RuleStore for MemoryStorage {
    async fn create_rule(&self, rule: ValidationRule) -> ValidationEngineResult<ValidationRule> {
        let mut rules = self.rules.write().await;
        rules.insert(rule.id, rule.clone());
        Ok(rule)
    }

    async fn get_rule(&self, id: Uuid) -> ValidationEngineResult<Option<ValidationRule>> {
        let rules = self.rules.read().await;
        Ok(rules.get(&id).cloned())
    }

    async fn get_rules_by_api_spec(
        &self,
        api_spec_id: Uuid,
    ) -> ValidationEngineResult<Vec<ValidationRule>> {
        let rules = self.rules.read().await;
        let mut scoped: Vec<ValidationRule> = rules
            .values()
            .filter(|rule| rule.api_spec_id == api_spec_id)
            .cloned()
            .collect();
        scoped.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(scoped)
    }

    async fn update_rule(&self, rule: ValidationRule) -> ValidationEngineResult<ValidationRule> {
        let mut rules = self.rules.write().await;
        if !rules.contains_key(&rule.id) {
            return Err(ValidationEngineError::RuleNotFound(rule.id));
        }
        rules.insert(rule.id, rule.clone());
        Ok(rule)
    }

    async fn delete_rule(&self, id: Uuid) -> ValidationEngineResult<bool> {
        let mut rules = self.rules.write().await;
        Ok(rules.remove(&id).is_some())
    }

    async fn list_rules(&self) -> ValidationEngineResult<Vec<ValidationRule>> {
        let rules = self.rules.read().await;
        let mut all: Vec<ValidationRule> = rules.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn link_result(
        &self,
        execution_id: Uuid,
        result: &ValidationResult,
    ) -> ValidationEngineResult<()> {
        let serialized = serde_json::to_value(result)?;
        let mut linked = self.linked_results.write().await;
        linked.insert(execution_id, serialized);
        Ok(())
    }

    async fn health_check(&self) -> ValidationEngineResult<bool> {
        // Basic health check - ensure the maps are accessible
        let _ = self.rules.read().await.len();
        Ok(true)
    }

    async fn shutdown(&self) -> ValidationEngineResult<()> {
        {
            let mut rules = self.rules.write().await;
            rules.clear();
        }
        {
            let mut linked = self.linked_results.write().await;
            linked.clear();
        }

        tracing::debug!("Memory storage shutdown completed");
        Ok(())
    }
}
