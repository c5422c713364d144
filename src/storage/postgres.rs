//! PostgreSQL storage implementation

use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::{RuleType, ValidationResult, ValidationRule};
use crate::error::{ValidationEngineError, ValidationEngineResult};
use crate::storage::RuleStore;

/// PostgreSQL storage implementation
///
/// Owns the `validation_rules` table. The `test_executions` table written
/// by result linking belongs to the execution service; only its
/// `validation_result` column is touched here.
pub struct PostgresStorage {
    /// Database connection pool
    pool: sqlx::PgPool,
}

impl PostgresStorage {
    /// Create a new PostgreSQL storage instance
    pub async fn new(database_url: &str) -> ValidationEngineResult<Self> {
        let pool = sqlx::PgPool::connect(database_url).await.map_err(|e| {
            ValidationEngineError::Storage {
                message: format!("Connection error: {}", e),
            }
        })?;

        Self::create_schema(&pool).await?;

        Ok(Self { pool })
    }

    /// Create database schema
    async fn create_schema(pool: &sqlx::PgPool) -> ValidationEngineResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS validation_rules (
                id UUID PRIMARY KEY,
                api_spec_id UUID NOT NULL,
                rule_type VARCHAR(50) NOT NULL,
                rule_definition JSONB NOT NULL,
                created_at TIMESTAMP WITH TIME ZONE NOT NULL,
                updated_at TIMESTAMP WITH TIME ZONE NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| ValidationEngineError::Storage {
            message: format!("Query error: {}", e),
        })?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_validation_rules_api_spec_id \
             ON validation_rules(api_spec_id)",
        )
        .execute(pool)
        .await
        .map_err(|e| ValidationEngineError::Storage {
            message: format!("Query error: {}", e),
        })?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_validation_rules_created_at \
             ON validation_rules(created_at)",
        )
        .execute(pool)
        .await
        .map_err(|e| ValidationEngineError::Storage {
            message: format!("Query error: {}", e),
        })?;

        Ok(())
    }

    /// Map a database row onto a rule entity
    fn map_rule(row: &sqlx::postgres::PgRow) -> ValidationEngineResult<ValidationRule> {
        let rule_type: String = row.try_get("rule_type")?;
        Ok(ValidationRule {
            id: row.try_get("id")?,
            api_spec_id: row.try_get("api_spec_id")?,
            rule_type: RuleType::parse(&rule_type)?,
            rule_definition: row.try_get("rule_definition")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl RuleStore for PostgresStorage {
    async fn create_rule(&self, rule: ValidationRule) -> ValidationEngineResult<ValidationRule> {
        sqlx::query(
            r#"
            INSERT INTO validation_rules (id, api_spec_id, rule_type, rule_definition, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(rule.id)
        .bind(rule.api_spec_id)
        .bind(rule.rule_type.as_str())
        .bind(&rule.rule_definition)
        .bind(rule.created_at)
        .bind(rule.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(rule)
    }

    async fn get_rule(&self, id: Uuid) -> ValidationEngineResult<Option<ValidationRule>> {
        let row = sqlx::query(
            "SELECT id, api_spec_id, rule_type, rule_definition, created_at, updated_at \
             FROM validation_rules WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::map_rule).transpose()
    }

    async fn get_rules_by_api_spec(
        &self,
        api_spec_id: Uuid,
    ) -> ValidationEngineResult<Vec<ValidationRule>> {
        let rows = sqlx::query(
            "SELECT id, api_spec_id, rule_type, rule_definition, created_at, updated_at \
             FROM validation_rules WHERE api_spec_id = $1 ORDER BY created_at ASC",
        )
        .bind(api_spec_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_rule).collect()
    }

    async fn update_rule(&self, rule: ValidationRule) -> ValidationEngineResult<ValidationRule> {
        let updated = sqlx::query(
            r#"
            UPDATE validation_rules
            SET rule_type = $2, rule_definition = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(rule.id)
        .bind(rule.rule_type.as_str())
        .bind(&rule.rule_definition)
        .bind(rule.updated_at)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(ValidationEngineError::RuleNotFound(rule.id));
        }

        Ok(rule)
    }

    async fn delete_rule(&self, id: Uuid) -> ValidationEngineResult<bool> {
        let deleted = sqlx::query("DELETE FROM validation_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(deleted.rows_affected() > 0)
    }

    async fn list_rules(&self) -> ValidationEngineResult<Vec<ValidationRule>> {
        let rows = sqlx::query(
            "SELECT id, api_spec_id, rule_type, rule_definition, created_at, updated_at \
             FROM validation_rules ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::map_rule).collect()
    }

    async fn link_result(
        &self,
        execution_id: Uuid,
        result: &ValidationResult,
    ) -> ValidationEngineResult<()> {
        let serialized = serde_json::to_value(result)?;

        sqlx::query("UPDATE test_executions SET validation_result = $2 WHERE id = $1")
            .bind(execution_id)
            .bind(serialized)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn health_check(&self) -> ValidationEngineResult<bool> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(true)
    }

    async fn shutdown(&self) -> ValidationEngineResult<()> {
        self.pool.close().await;

        tracing::debug!("PostgreSQL storage shutdown completed");
        Ok(())
    }
}
