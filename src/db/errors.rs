//! # Database Errors
//!
//! Error types for the in-memory persistence layer.

use thiserror::Error;

use crate::model::ModelError;

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Persistence errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DbError {
    /// Mass assignment rejected the input
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Lookup by id failed; `scope` names the owning record, if any
    #[error("Couldn't find {model} with ID={id}{scope}")]
    RecordNotFound {
        model: &'static str,
        id: String,
        scope: String,
    },

    /// Explicit id collides with an existing row
    #[error("{model} with ID={id} already exists")]
    RecordNotUnique { model: &'static str, id: i64 },

    /// No id left after the highest stored one
    #[error("{model} id sequence exhausted")]
    IdSequenceExhausted { model: &'static str },

    /// Model attributes disagree with the migrated table
    #[error("schema mismatch for table '{table}': {reason}")]
    SchemaMismatch { table: String, reason: String },

    /// Migration could not be applied
    #[error("migration {version} failed: {reason}")]
    MigrationFailed { version: u64, reason: String },
}

impl DbError {
    pub fn not_found(model: &'static str, id: impl ToString) -> Self {
        DbError::RecordNotFound {
            model,
            id: id.to_string(),
            scope: String::new(),
        }
    }

    /// Not found among the records associated with an owner
    pub fn not_found_for(
        model: &'static str,
        id: impl ToString,
        owner: &'static str,
        owner_id: Option<i64>,
    ) -> Self {
        let owner_id = owner_id.map(|id| id.to_string()).unwrap_or_default();
        DbError::RecordNotFound {
            model,
            id: id.to_string(),
            scope: format!(" for {} with ID={}", owner, owner_id),
        }
    }

    /// Stable error code for envelopes and logs
    pub fn code(&self) -> &'static str {
        match self {
            DbError::Model(e) => e.code(),
            DbError::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            DbError::RecordNotUnique { .. } => "RECORD_NOT_UNIQUE",
            DbError::IdSequenceExhausted { .. } => "ID_SEQUENCE_EXHAUSTED",
            DbError::SchemaMismatch { .. } => "SCHEMA_MISMATCH",
            DbError::MigrationFailed { .. } => "MIGRATION_FAILED",
        }
    }
}
