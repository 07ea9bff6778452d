//! # Model Errors
//!
//! Errors raised while mass-assigning attributes onto a model.

use thiserror::Error;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Mass-assignment errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Parameters reached mass assignment without being permitted
    #[error("forbidden attributes: parameters must be permitted before mass assignment")]
    ForbiddenAttributes,

    /// Permitted key has no matching attribute on the model
    #[error("unknown attribute: {attribute}")]
    UnknownAttribute {
        model: &'static str,
        attribute: String,
    },

    /// Value shape cannot be cast to the attribute's type
    #[error("invalid value for attribute '{attribute}': expected {expected}, got {actual}")]
    TypeMismatch {
        attribute: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl ModelError {
    pub fn unknown_attribute(model: &'static str, attribute: impl Into<String>) -> Self {
        ModelError::UnknownAttribute {
            model,
            attribute: attribute.into(),
        }
    }

    /// Stable error code for envelopes and logs
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::ForbiddenAttributes => "FORBIDDEN_ATTRIBUTES",
            ModelError::UnknownAttribute { .. } => "UNKNOWN_ATTRIBUTE",
            ModelError::TypeMismatch { .. } => "TYPE_MISMATCH",
        }
    }
}
