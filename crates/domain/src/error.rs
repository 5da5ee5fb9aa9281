//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`LendBoxError`]
//! via `#[from]`. The HTTP adapter maps each top-level variant to a distinct
//! status code, so every rejected precondition must land in exactly one of them.

use crate::id::{DeviceId, LoanId};

/// Top-level error returned by services and repositories.
#[derive(Debug, thiserror::Error)]
pub enum LendBoxError {
    /// Malformed or referentially invalid input.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The requested record does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Well-formed request rejected by a business rule.
    #[error("conflict: {0}")]
    Conflict(#[from] ConflictError),

    /// Failure inside a storage adapter.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Input that can never be accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("borrower must not be empty")]
    EmptyBorrower,

    /// A loan referenced a device that does not exist.
    #[error("device {0} does not exist")]
    UnknownDevice(DeviceId),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The request could not be decoded into the expected shape.
    #[error("malformed request: {0}")]
    Malformed(String),
}

/// Lookup of a primary record failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Business-rule violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    #[error("device {0} is not available")]
    DeviceNotAvailable(DeviceId),

    #[error("loan {0} has already been returned")]
    LoanAlreadyReturned(LoanId),

    #[error("device {0} has loan history")]
    DeviceHasLoanHistory(DeviceId),
}
