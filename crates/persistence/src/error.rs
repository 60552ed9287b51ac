// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    DatabaseError(String),
    /// Database connection failed.
    #[error("Database connection failed: {0}")]
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),
    /// A stored row could not be turned back into a domain value.
    #[error("Row reconstruction error: {0}")]
    ReconstructionError(String),
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Initialization error.
    #[error("Initialization error: {0}")]
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    #[error("Foreign key enforcement is not enabled")]
    ForeignKeyEnforcementNotEnabled,
    /// A unique constraint rejected the write.
    #[error("Duplicate record: {0}")]
    Duplicate(String),
    /// The requested resource was not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            ) => Self::Duplicate(info.message().to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
