//! Error types for the Quotebook engine.

use crate::QuoteId;
use thiserror::Error;

/// All possible errors from the Quotebook engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("quote text must not be empty")]
    EmptyText,

    #[error("quote category must not be empty")]
    EmptyCategory,

    #[error("quote not found: {0}")]
    QuoteNotFound(QuoteId),

    // Interchange errors
    #[error("invalid import: {0}")]
    InvalidImport(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    // Persistence errors
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::QuoteNotFound("local-1".into());
        assert_eq!(err.to_string(), "quote not found: local-1");

        let err = Error::EmptyCategory;
        assert_eq!(err.to_string(), "quote category must not be empty");

        let err = Error::Storage("disk full".into());
        assert_eq!(err.to_string(), "storage error: disk full");
    }
}
