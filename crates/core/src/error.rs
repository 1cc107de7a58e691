//! Error model shared by every layer.

use thiserror::Error;

/// Result type returned by repositories and services.
pub type StoreResult<T> = Result<T, StoreError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures of caller input (malformed
/// identifiers, mismatched ids). Storage failures are `StoreError`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

/// Storage operation error.
///
/// These are **infrastructure errors** surfaced unchanged to the caller.
/// No layer in this workspace retries them.
///
/// ## Error Categories
///
/// - **NotFound**: a fetch-by-id matched zero rows
/// - **Conflict**: a unique constraint rejected the write
/// - **Constraint**: a foreign-key, check or not-null constraint rejected the write
/// - **Unavailable**: the pool is closed, timed out, or the connection failed
/// - **Query**: anything else (malformed query, undecodable row, ...)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
