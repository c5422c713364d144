//! JSON Schema check
//!
//! Validates a response body against a JSON Schema document and yields
//! structured, path-addressed violations. Unparsable schema text is a
//! data outcome, not an exception: it becomes a single `validation`
//! error inside the result, never a raised failure.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use jsonschema::Validator;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::domain::ValidationError;

/// Outcome of the schema check
///
/// The fail-soft contract is explicit in this type: a schema that cannot
/// be parsed or compiled is `Rejected`, carrying the error the caller
/// will see in the result.
#[derive(Debug, Clone)]
pub enum SchemaCheck {
    /// No schema supplied, nothing checked
    Skipped,
    /// Body conforms to the schema
    Passed,
    /// Body violates the schema
    Violations(Vec<ValidationError>),
    /// Schema text could not be parsed or compiled
    Rejected(ValidationError),
}

/// Schema validator with a parsed-schema cache
///
/// Compiling a schema is the dominant per-call cost; compiled validators
/// are cached keyed by a fingerprint of the schema text. The cache is a
/// pure performance optimization, validation outcomes never depend on it.
pub struct SchemaValidator {
    cache: RwLock<HashMap<String, Arc<Validator>>>,
    cache_enabled: bool,
}

impl SchemaValidator {
    /// Create a new schema validator with caching enabled
    pub fn new() -> Self {
        Self::with_cache(true)
    }

    /// Create a validator with explicit cache behavior
    pub fn with_cache(cache_enabled: bool) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            cache_enabled,
        }
    }

    /// Check a response body against optional JSON Schema text
    pub fn check(&self, body: &Value, schema_text: Option<&str>) -> SchemaCheck {
        let Some(schema_text) = schema_text else {
            return SchemaCheck::Skipped;
        };
        if schema_text.is_empty() {
            return SchemaCheck::Skipped;
        }

        let validator = match self.compiled(schema_text) {
            Ok(validator) => validator,
            Err(detail) => {
                return SchemaCheck::Rejected(ValidationError::error(
                    "validation",
                    format!("Validation error: {}", detail),
                ));
            }
        };

        let violations: Vec<ValidationError> = validator
            .iter_errors(body)
            .map(|error| {
                let path = dotted_path(error.instance_path().as_str());
                ValidationError::error(&path, error.to_string())
            })
            .collect();

        if violations.is_empty() {
            SchemaCheck::Passed
        } else {
            SchemaCheck::Violations(violations)
        }
    }

    /// Parse and compile schema text, consulting the cache first
    fn compiled(&self, schema_text: &str) -> Result<Arc<Validator>, String> {
        let key = fingerprint(schema_text);

        if self.cache_enabled {
            let cache = self.cache.read().expect("schema cache poisoned");
            if let Some(validator) = cache.get(&key) {
                return Ok(validator.clone());
            }
        }

        let schema: Value =
            serde_json::from_str(schema_text).map_err(|e| format!("invalid schema JSON: {}", e))?;
        let validator =
            jsonschema::validator_for(&schema).map_err(|e| format!("invalid schema: {}", e))?;
        let validator = Arc::new(validator);

        if self.cache_enabled {
            let mut cache = self.cache.write().expect("schema cache poisoned");
            cache.insert(key, validator.clone());
        }

        Ok(validator)
    }

    /// Number of cached compiled schemas
    pub fn cached_schemas(&self) -> usize {
        self.cache.read().expect("schema cache poisoned").len()
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// SHA-256 fingerprint of schema text, the cache key
fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Convert a JSON pointer into a dotted document path
///
/// `/address/zip` becomes `address.zip`, array indices render as
/// `items[0].id`. The document root is `$`.
fn dotted_path(pointer: &str) -> String {
    if pointer.is_empty() {
        return "$".to_string();
    }

    let mut path = String::new();
    for token in pointer.trim_start_matches('/').split('/') {
        let segment = token.replace("~1", "/").replace("~0", "~");
        if is_array_index(&segment) {
            path.push('[');
            path.push_str(&segment);
            path.push(']');
        } else {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(&segment);
        }
    }
    path
}

fn is_array_index(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|ch| ch.is_ascii_digit())
}
