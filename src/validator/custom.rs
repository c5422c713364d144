//! Custom rule evaluation seam
//!
//! The `custom` rule tag carries an opaque payload with no defined
//! evaluation semantics yet. This trait is the pluggable seam a future
//! rule type implements; until an evaluator is registered, evaluating a
//! custom rule is rejected as unsupported. Rule storage accepts custom
//! rules regardless.

use serde_json::Value;

use crate::domain::ValidationError;

/// Evaluator for `custom` rule payloads
pub trait CustomRuleEvaluator: Send + Sync {
    /// Evaluate a response body against a custom rule payload
    ///
    /// Returns field-level violations; an empty list means the body
    /// conforms.
    fn evaluate(&self, body: &Value, definition: &Value) -> Vec<ValidationError>;
}
