//! Resource service error types.

use thiserror::Error;

use super::UniqueField;

/// Failures of the Pokemon resource service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PokemonError {
    /// Malformed identifier or input shape.
    #[error("{0}")]
    InvalidArgument(String),

    /// A uniqueness constraint was violated.
    #[error("Pokemon with {field} {value} already exists")]
    DuplicateKey { field: UniqueField, value: String },

    /// No record has the given id.
    #[error("Pokemon with id {0} not found")]
    NotFound(String),

    /// Any other persistence failure. Details are logged, not returned.
    #[error("internal failure, check server logs")]
    InternalFailure,
}

impl From<validator::ValidationErrors> for PokemonError {
    fn from(errors: validator::ValidationErrors) -> Self {
        PokemonError::InvalidArgument(errors.to_string())
    }
}
