//! Errors raised while building or checking warehouse records.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Failures that come from the records themselves, never from storage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Rejected input: blank SKU, unparsable date, inverted date range.
    #[error("invalid record: {0}")]
    Validation(String),

    /// Records are individually valid but contradict each other.
    #[error("inconsistent records: {0}")]
    InvariantViolation(String),

    #[error("bad record id: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
