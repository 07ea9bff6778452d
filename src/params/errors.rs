//! # Parameter Errors
//!
//! Error types for the parameter filter.

use thiserror::Error;

/// Result type for parameter operations
pub type ParamResult<T> = Result<T, ParamError>;

/// Parameter filter errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// Required key absent or blank
    #[error("param is missing or the value is empty: {param}")]
    ParameterMissing { param: String },

    /// Required key holds a non-blank value that is not a tree
    #[error("param is not a parameter tree: {param} (got {actual})")]
    NotATree { param: String, actual: &'static str },

    /// Permit-list in JSON form could not be parsed
    #[error("invalid permit spec: {0}")]
    InvalidSpec(String),
}

impl ParamError {
    pub fn missing(param: impl Into<String>) -> Self {
        ParamError::ParameterMissing {
            param: param.into(),
        }
    }

    /// Stable error code for envelopes and logs
    pub fn code(&self) -> &'static str {
        match self {
            ParamError::ParameterMissing { .. } => "PARAMETER_MISSING",
            ParamError::NotATree { .. } => "PARAMETER_NOT_A_TREE",
            ParamError::InvalidSpec(_) => "INVALID_PERMIT_SPEC",
        }
    }
}
