//! Status code check
//!
//! Compares an actual status code against an optional expectation. Never
//! fails; always returns a contribution to the aggregate result.

use crate::domain::ValidationError;

/// Outcome of the status check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusCheck {
    /// No expectation supplied, nothing checked
    Skipped,
    /// Actual matched expected
    Passed,
    /// Actual differed from expected
    Mismatch(ValidationError),
}

/// Compare an actual status code against an optional expected one
pub fn check(actual: u16, expected: Option<u16>) -> StatusCheck {
    match expected {
        None => StatusCheck::Skipped,
        Some(expected) if actual == expected => StatusCheck::Passed,
        Some(expected) => StatusCheck::Mismatch(ValidationError::error(
            "status_code",
            format!("Expected status code {}, got {}", expected, actual),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_without_expectation() {
        assert_eq!(check(500, None), StatusCheck::Skipped);
    }

    #[test]
    fn test_passed_on_match() {
        assert_eq!(check(200, Some(200)), StatusCheck::Passed);
    }

    #[test]
    fn test_mismatch_message() {
        let StatusCheck::Mismatch(error) = check(404, Some(200)) else {
            panic!("expected mismatch");
        };
        assert_eq!(error.field, "status_code");
        assert_eq!(error.message, "Expected status code 200, got 404");
    }
}
