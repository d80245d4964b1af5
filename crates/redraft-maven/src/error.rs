//! Error types for POM refactoring.

use std::fmt;

use redraft_core::error::CoreError;
use redraft_core::validate::Invalid;
use serde::Serialize;
use thiserror::Error;

/// One rule that failed configuration validation, with every offending
/// field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidRule {
    pub rule: String,
    pub failures: Vec<Invalid>,
}

impl fmt::Display for InvalidRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self
            .failures
            .iter()
            .map(|failure| failure.field.as_str())
            .collect();
        write!(f, "{} ({})", self.rule, fields.join(", "))
    }
}

/// Unified error type for the rewrite driver.
#[derive(Debug, Error)]
pub enum RefactorError {
    /// One or more rules failed validation; the pass never touched the
    /// tree.
    #[error("invalid rule configuration: {}", .invalid.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    InvalidRules { invalid: Vec<InvalidRule> },

    /// Error from the core engine.
    #[error(transparent)]
    Core(#[from] CoreError),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_rules_display_names_rules_and_fields() {
        let err = RefactorError::InvalidRules {
            invalid: vec![InvalidRule {
                rule: "maven.add-dependency".to_string(),
                failures: vec![
                    Invalid {
                        field: "group_id".to_string(),
                        message: "missing required field".to_string(),
                    },
                    Invalid {
                        field: "version".to_string(),
                        message: "missing required field".to_string(),
                    },
                ],
            }],
        };
        assert_eq!(
            err.to_string(),
            "invalid rule configuration: maven.add-dependency (group_id, version)"
        );
    }
}
