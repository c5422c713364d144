//! API endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::domain::{ValidationResult, ValidationRule};
use crate::{ValidationEngine, ENGINE_NAME};

use super::{error::ApiError, requests::*, responses::*};

/// Health check endpoint
pub async fn health_check(
    State(engine): State<Arc<ValidationEngine>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let healthy = engine
        .health_check()
        .await
        .map_err(|e| ApiError::internal(&e.to_string()))?;

    Ok(Json(HealthResponse {
        status: if healthy {
            "healthy".to_string()
        } else {
            "unhealthy".to_string()
        },
        service: ENGINE_NAME.to_string(),
        timestamp: chrono::Utc::now(),
    }))
}

/// Validate response endpoint
///
/// Always answers 200 with a validation result when the engine ran;
/// data-level failures are inside the result, not a failure status.
pub async fn validate_response(
    State(engine): State<Arc<ValidationEngine>>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidationResult>, ApiError> {
    let result = engine
        .validate_response(
            &request.response,
            request.status_code,
            request.expected_status_code,
            request.json_schema.as_deref(),
            request.execution_id,
        )
        .await;

    Ok(Json(result))
}

/// List rules endpoint
pub async fn list_rules(
    State(engine): State<Arc<ValidationEngine>>,
    Query(query): Query<ListRulesQuery>,
) -> Result<Json<ListRulesResponse>, ApiError> {
    let rules = match query.api_spec_id {
        Some(api_spec_id) => engine.get_rules_by_api_spec_id(api_spec_id).await?,
        None => engine.list_rules().await?,
    };

    let count = rules.len();
    Ok(Json(ListRulesResponse { rules, count }))
}

/// Get rule endpoint
pub async fn get_rule(
    State(engine): State<Arc<ValidationEngine>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ValidationRule>, ApiError> {
    let rule = engine
        .get_rule_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(&format!("Rule not found: {}", id)))?;

    Ok(Json(rule))
}

/// Create rule endpoint
pub async fn create_rule(
    State(engine): State<Arc<ValidationEngine>>,
    Json(request): Json<CreateRuleRequest>,
) -> Result<(StatusCode, Json<ValidationRule>), ApiError> {
    let rule = engine
        .create_rule(
            request.api_spec_id,
            request.rule_type,
            request.rule_definition,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(rule)))
}

/// Update rule endpoint
pub async fn update_rule(
    State(engine): State<Arc<ValidationEngine>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRuleRequest>,
) -> Result<Json<ValidationRule>, ApiError> {
    let rule = engine
        .update_rule(id, request.rule_type, request.rule_definition)
        .await?;

    Ok(Json(rule))
}

/// Delete rule endpoint
pub async fn delete_rule(
    State(engine): State<Arc<ValidationEngine>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteRuleResponse>, ApiError> {
    engine.delete_rule(id).await?;

    Ok(Json(DeleteRuleResponse {
        message: "Rule deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationEngineConfig;
    use crate::domain::RuleType;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn engine() -> Arc<ValidationEngine> {
        let store = Arc::new(MemoryStorage::new().unwrap());
        Arc::new(ValidationEngine::with_store(
            ValidationEngineConfig::default(),
            store,
        ))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let Json(response) = health_check(State(engine())).await.unwrap();
        assert_eq!(response.status, "healthy");
        assert_eq!(response.service, ENGINE_NAME);
    }

    #[tokio::test]
    async fn test_validate_endpoint_returns_result() {
        let request = ValidateRequest {
            response: json!({"name": 123}),
            status_code: 404,
            json_schema: Some(
                r#"{"type": "object", "properties": {"name": {"type": "string"}}}"#.to_string(),
            ),
            expected_status_code: Some(200),
            execution_id: None,
        };

        let Json(result) = validate_response(State(engine()), Json(request))
            .await
            .unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].field, "status_code");
        assert_eq!(result.errors[1].field, "name");
    }

    #[tokio::test]
    async fn test_create_returns_created_status() {
        let request = CreateRuleRequest {
            api_spec_id: Uuid::new_v4(),
            rule_type: RuleType::Status,
            rule_definition: json!(200),
        };

        let (status, Json(rule)) = create_rule(State(engine()), Json(request)).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(rule.rule_type, RuleType::Status);
    }

    #[tokio::test]
    async fn test_create_invalid_rule_rejected() {
        let request = CreateRuleRequest {
            api_spec_id: Uuid::new_v4(),
            rule_type: RuleType::Schema,
            rule_definition: json!({}),
        };

        let error = create_rule(State(engine()), Json(request))
            .await
            .expect_err("empty definition");
        assert_eq!(error.status_code(), 400);
    }

    #[tokio::test]
    async fn test_get_missing_rule_is_not_found() {
        let error = get_rule(State(engine()), Path(Uuid::new_v4()))
            .await
            .expect_err("missing rule");
        assert_eq!(error.status_code(), 404);
    }

    #[tokio::test]
    async fn test_list_rules_scoped_by_query() {
        let engine = engine();
        let spec = Uuid::new_v4();
        engine
            .create_rule(spec, RuleType::Status, json!(200))
            .await
            .unwrap();
        engine
            .create_rule(Uuid::new_v4(), RuleType::Status, json!(404))
            .await
            .unwrap();

        let Json(all) = list_rules(State(engine.clone()), Query(ListRulesQuery::default()))
            .await
            .unwrap();
        assert_eq!(all.count, 2);

        let Json(scoped) = list_rules(
            State(engine),
            Query(ListRulesQuery {
                api_spec_id: Some(spec),
            }),
        )
        .await
        .unwrap();
        assert_eq!(scoped.count, 1);
    }
}
