//! Aggregate rule-configuration validation.
//!
//! Every required-field check produces a [`Validated`]; checks compose with
//! [`Validated::and`] so a rule reports all of its missing or invalid fields
//! together, not just the first.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A single named validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invalid {
    pub field: String,
    pub message: String,
}

impl fmt::Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Composable result of validating a rule configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validated {
    failures: Vec<Invalid>,
}

impl Validated {
    pub fn valid() -> Validated {
        Validated::default()
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Validated {
        Validated {
            failures: vec![Invalid {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    /// Combine with another check, keeping every failure from both sides.
    pub fn and(mut self, other: Validated) -> Validated {
        self.failures.extend(other.failures);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Every offending field, in check order.
    pub fn failures(&self) -> &[Invalid] {
        &self.failures
    }

    /// Convert into a result, naming the rule and every offending field.
    pub fn into_result(self, rule: &str) -> Result<(), CoreError> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidConfiguration {
                rule: rule.to_string(),
                failures: self.failures,
            })
        }
    }
}

/// Check that a required configuration field is present and non-empty.
pub fn required(field: &str, value: Option<&str>) -> Validated {
    match value {
        Some(value) if !value.is_empty() => Validated::valid(),
        _ => Validated::invalid(field, "missing required field"),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_field_is_valid() {
        assert!(required("group_id", Some("com.foo")).is_valid());
    }

    #[test]
    fn absent_and_empty_fields_are_invalid() {
        assert!(!required("group_id", None).is_valid());
        assert!(!required("group_id", Some("")).is_valid());
    }

    #[test]
    fn and_aggregates_every_failure() {
        let validated = required("group_id", Some("com.foo"))
            .and(required("artifact_id", None))
            .and(required("to_version", None));
        assert!(!validated.is_valid());
        let fields: Vec<&str> = validated
            .failures()
            .iter()
            .map(|f| f.field.as_str())
            .collect();
        assert_eq!(fields, ["artifact_id", "to_version"]);
    }

    #[test]
    fn into_result_names_rule_and_fields() {
        let err = required("key", None)
            .and(required("to_value", None))
            .into_result("maven.change-property-value")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("maven.change-property-value"));
        assert!(message.contains("key"));
        assert!(message.contains("to_value"));
    }

    #[test]
    fn valid_into_result_is_ok() {
        assert!(required("key", Some("x")).into_result("rule").is_ok());
    }
}
