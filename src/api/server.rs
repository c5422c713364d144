//! API server implementation
//!
//! Router setup over the validation engine. Endpoints are mounted under
//! the configured base path; the health endpoint is also reachable at
//! the root for liveness probes.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::ValidationEngine;

use super::endpoints::*;

/// API server for the validation engine
pub struct ValidationApi {
    /// Engine shared across handlers
    engine: Arc<ValidationEngine>,

    /// Router
    router: Router,
}

impl ValidationApi {
    /// Create a new API server
    pub fn new(engine: Arc<ValidationEngine>) -> Self {
        let base_path = {
            let configured = &engine.config().api.base_path;
            if configured.starts_with('/') {
                configured.clone()
            } else {
                format!("/{}", configured)
            }
        };

        let router = Self::create_router(engine.clone(), &base_path);

        Self { engine, router }
    }

    /// Create the router with all endpoints
    fn create_router(engine: Arc<ValidationEngine>, base_path: &str) -> Router {
        let api_routes = Router::new()
            .route("/validate", post(validate_response))
            .route("/rules", get(list_rules))
            .route("/rules", post(create_rule))
            .route("/rules/{id}", get(get_rule))
            .route("/rules/{id}", put(update_rule))
            .route("/rules/{id}", delete(delete_rule))
            .route("/health", get(health_check));

        Router::new()
            .nest(base_path, api_routes)
            .route("/health", get(health_check))
            .with_state(engine)
            .layer(axum::middleware::from_fn(
                super::middleware::request_id_middleware,
            ))
            .layer(axum::middleware::from_fn(
                super::middleware::request_logging_middleware,
            ))
    }

    /// Create the Axum app
    pub fn create_app(&self) -> Router {
        self.router.clone()
    }

    /// Get the router
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get the engine behind the server
    pub fn engine(&self) -> &Arc<ValidationEngine> {
        &self.engine
    }
}
