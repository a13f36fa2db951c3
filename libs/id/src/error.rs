//! Error types for ID parsing and validation.

use thiserror::Error;

/// Errors that can occur when parsing or validating IDs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The ID string is empty.
    #[error("ID cannot be empty")]
    Empty,

    /// The ID does not have the fixed hex length.
    #[error("invalid ID length: expected {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// The ID contains a non-hex character.
    #[error("invalid ID: '{0}' is not a hex string")]
    InvalidHex(String),
}
