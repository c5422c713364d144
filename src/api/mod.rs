//! HTTP boundary for the validation engine
//!
//! Thin request/response mapping over the engine: handlers, DTOs, error
//! mapping, and the router. No validation semantics live here.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod requests;
pub mod responses;
pub mod server;

pub use error::ApiError;
pub use requests::{CreateRuleRequest, ListRulesQuery, UpdateRuleRequest, ValidateRequest};
pub use responses::{DeleteRuleResponse, ErrorResponse, HealthResponse, ListRulesResponse};
pub use server::ValidationApi;
