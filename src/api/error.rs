//! API error handling
//!
//! Maps each engine error kind onto a distinct response code. Data-level
//! validation failures never reach this type; they travel inside the
//! validation result.

use crate::error::ValidationEngineError;

/// API error
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Not found
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Internal server error
    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Create a bad request error
    pub fn bad_request(message: &str) -> Self {
        Self::BadRequest {
            message: message.to_string(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: &str) -> Self {
        Self::NotFound {
            message: message.to_string(),
        }
    }

    /// Create an internal error
    pub fn internal(message: &str) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    /// The status code this error maps to
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::Internal { .. } => 500,
        }
    }
}

impl From<ValidationEngineError> for ApiError {
    fn from(error: ValidationEngineError) -> Self {
        match error {
            ValidationEngineError::InvalidRule { message } => Self::BadRequest { message },
            ValidationEngineError::Unsupported { message } => Self::BadRequest { message },
            ValidationEngineError::Config { message } => Self::BadRequest { message },
            ValidationEngineError::RuleNotFound(id) => Self::NotFound {
                message: format!("Rule not found: {}", id),
            },
            ValidationEngineError::Storage { message } => Self::Internal { message },
            ValidationEngineError::Serialization { message } => Self::Internal { message },
            ValidationEngineError::Internal { message } => Self::Internal { message },
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest { ref message } => {
                (axum::http::StatusCode::BAD_REQUEST, message.clone())
            }
            ApiError::NotFound { ref message } => {
                (axum::http::StatusCode::NOT_FOUND, message.clone())
            }
            ApiError::Internal { ref message } => (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                message.clone(),
            ),
        };

        let body = axum::response::Json(crate::api::responses::ErrorResponse {
            error: self.to_string(),
            message,
            status_code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
