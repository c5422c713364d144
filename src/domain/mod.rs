//! Domain entities for the validation engine
//!
//! Rules are stored expectations scoped to an API specification; results
//! are the outcome of one validation run. Both carry their shape
//! invariants here, no behavior beyond that.

pub mod result;
pub mod rule;

pub use result::{
    CheckDetails, CheckOutcome, Severity, ValidationError, ValidationResult,
};
pub use rule::{RuleType, ValidationRule};
