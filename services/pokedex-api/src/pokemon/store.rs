//! Storage seam for Pokemon records.

use async_trait::async_trait;
use pokedex_id::ObjectId;
use thiserror::Error;

use super::{Pokemon, UpdatePokemon};

/// A field carrying a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Name,
    No,
}

impl UniqueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::No => "no",
        }
    }
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by a store, already classified from the backend's native
/// error signal.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write would violate the uniqueness constraint on a field.
    #[error("duplicate key on field '{0}'")]
    Duplicate(UniqueField),

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Document-collection operations over Pokemon records.
///
/// Implementations enforce uniqueness of `name` and `no` and report
/// violations as [`StoreError::Duplicate`].
#[async_trait]
pub trait PokemonStore: Send + Sync {
    /// Insert a single record.
    async fn insert(&self, pokemon: &Pokemon) -> Result<(), StoreError>;

    /// Find a record by id.
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Pokemon>, StoreError>;

    /// Return up to `limit` records after skipping `skip`, ascending by `no`.
    async fn find_page(&self, limit: u32, skip: u64) -> Result<Vec<Pokemon>, StoreError>;

    /// Count all records.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Apply a partial update. Returns false if no record has this id.
    async fn update_by_id(&self, id: &ObjectId, patch: &UpdatePokemon)
        -> Result<bool, StoreError>;

    /// Delete a record. Returns false if no record has this id.
    async fn delete_by_id(&self, id: &ObjectId) -> Result<bool, StoreError>;

    /// Delete every record, returning how many were removed.
    async fn delete_all(&self) -> Result<u64, StoreError>;

    /// Insert a batch of records.
    async fn insert_many(&self, pokemon: &[Pokemon]) -> Result<(), StoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
