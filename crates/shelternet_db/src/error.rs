//! Error types for the database layer.

use crate::batch::BatchRejection;
use thiserror::Error;

/// Database operation result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error (connection, query, etc.)
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// IO error (file system operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Referenced resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Constraint violation (negative capacity, bad input, etc.)
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Invalid state transition
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Stored data breaks an invariant the schema should have kept
    #[error("Corrupted data: {0}")]
    Corrupted(String),

    /// A batch operation failed validation; nothing was written.
    #[error("{0}")]
    Rejected(BatchRejection),

    /// A shelter does not have enough free slots.
    #[error("Capacity exceeded: {requested} slot(s) requested, {remaining} remaining")]
    CapacityExceeded { requested: i64, remaining: i64 },
}

impl DbError {
    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a constraint error.
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Create an invalid state error.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a corrupted data error.
    pub fn corrupted(msg: impl Into<String>) -> Self {
        Self::Corrupted(msg.into())
    }

    /// True for failures caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Sqlx(_) | Self::Io(_) | Self::Corrupted(_))
    }
}

impl From<BatchRejection> for DbError {
    fn from(rejection: BatchRejection) -> Self {
        Self::Rejected(rejection)
    }
}
