//! Error types for the core engine.

use thiserror::Error;

use crate::validate::Invalid;

/// Unified error type for the core engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A rule configuration failed validation; every offending field is
    /// reported together.
    #[error("invalid configuration for rule '{rule}': {}", .failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    InvalidConfiguration { rule: String, failures: Vec<Invalid> },

    /// A change was constructed with neither an original nor a fixed
    /// snapshot.
    #[error("a change requires at least one of an original or fixed snapshot")]
    EmptySnapshotPair,
}

impl CoreError {
    /// The offending fields for a configuration error, empty otherwise.
    pub fn failed_fields(&self) -> Vec<&str> {
        match self {
            CoreError::InvalidConfiguration { failures, .. } => {
                failures.iter().map(|f| f.field.as_str()).collect()
            }
            CoreError::EmptySnapshotPair => Vec::new(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
