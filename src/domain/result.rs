//! Validation result entity
//!
//! The outcome of one validation run. Results are immutable once
//! returned; the only later change is linking to an external test
//! execution, which does not alter the computed outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error severity
///
/// `error` entries fail validation; `warning` entries are reported only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single field-level violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Path into the response document, or a named check
    pub field: String,

    /// Human-readable message
    pub message: String,

    /// Error severity
    pub severity: Severity,
}

impl ValidationError {
    /// Create an error-severity violation
    pub fn error(field: &str, message: String) -> Self {
        Self {
            field: field.to_string(),
            message,
            severity: Severity::Error,
        }
    }

    /// Create a warning-severity violation
    pub fn warning(field: &str, message: String) -> Self {
        Self {
            field: field.to_string(),
            message,
            severity: Severity::Warning,
        }
    }
}

/// Outcome of one named check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckOutcome {
    /// Check not requested
    #[default]
    Skipped,
    /// Check ran and passed
    Passed,
    /// Check ran and produced errors
    Failed,
}

/// Fixed set of per-check outcomes
///
/// Each check's presence or absence is explicit; there is no free-form
/// detail map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CheckDetails {
    /// Status code comparison
    pub status_check: CheckOutcome,

    /// JSON Schema check
    pub schema_check: CheckOutcome,
}

/// Outcome of one validation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Unique result identifier
    pub id: Uuid,

    /// External test execution this result is linked to, absent until linked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<Uuid>,

    /// True iff the error list is empty after all checks ran
    pub is_valid: bool,

    /// Ordered violations, status check contributions first
    pub errors: Vec<ValidationError>,

    /// Per-check outcomes
    pub details: CheckDetails,

    /// Set at creation, immutable afterward
    pub validated_at: DateTime<Utc>,
}

impl ValidationResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            execution_id: None,
            is_valid: true,
            errors: Vec::new(),
            details: CheckDetails::default(),
            validated_at: Utc::now(),
        }
    }

    /// Append a violation and recompute validity
    pub fn record_error(&mut self, error: ValidationError) {
        self.errors.push(error);
        self.is_valid = self.errors.is_empty();
    }

    /// Append several violations, preserving their order
    pub fn record_errors(&mut self, errors: Vec<ValidationError>) {
        self.errors.extend(errors);
        self.is_valid = self.errors.is_empty();
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}
