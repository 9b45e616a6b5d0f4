//! Typed failures at the engine boundary.

use thiserror::Error;

/// Rejected input. Empty task lists are not an error; see `Advice::NoInput`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A task field is non-numeric, non-finite or out of range
    #[error("invalid task '{id}': field `{field}` {reason}")]
    InvalidTask {
        id: String,
        field: &'static str,
        reason: String,
    },

    /// A weighting parameter is out of range
    #[error("invalid configuration: field `{field}` {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

impl EngineError {
    pub fn invalid_task(id: impl Into<String>, field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidTask {
            id: id.into(),
            field,
            reason: reason.into(),
        }
    }

    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            EngineError::InvalidTask { field, .. } | EngineError::InvalidConfig { field, .. } => field,
        }
    }
}

/// Check that `value` is finite and non-negative.
pub(crate) fn non_negative(value: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("must be a finite number, got {value}"));
    }
    if value < 0.0 {
        return Err(format!("must be >= 0, got {value}"));
    }
    Ok(())
}
