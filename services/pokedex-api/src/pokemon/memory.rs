//! In-memory Pokemon store.
//!
//! Enforces the same uniqueness rules as the Postgres store so the resource
//! service behaves identically on either backend.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use pokedex_id::ObjectId;
use tokio::sync::RwLock;
use tracing::debug;

use super::{Pokemon, PokemonStore, StoreError, UniqueField, UpdatePokemon};

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    no: i32,
    /// Revision counter, bumped on every update.
    version: i32,
}

impl Entry {
    fn to_pokemon(&self, id: ObjectId) -> Pokemon {
        Pokemon {
            id,
            name: self.name.clone(),
            no: self.no,
        }
    }
}

/// A `PokemonStore` kept entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryPokemonStore {
    entries: RwLock<BTreeMap<ObjectId, Entry>>,
}

impl MemoryPokemonStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Check `name`/`no` against every entry except `skip`.
fn check_unique(
    entries: &BTreeMap<ObjectId, Entry>,
    skip: Option<&ObjectId>,
    name: Option<&str>,
    no: Option<i32>,
) -> Result<(), StoreError> {
    let others = entries
        .iter()
        .filter(|(id, _)| Some(*id) != skip)
        .map(|(_, entry)| entry);

    for entry in others {
        if name.is_some_and(|name| entry.name == name) {
            return Err(StoreError::Duplicate(UniqueField::Name));
        }
        if no.is_some_and(|no| entry.no == no) {
            return Err(StoreError::Duplicate(UniqueField::No));
        }
    }
    Ok(())
}

#[async_trait]
impl PokemonStore for MemoryPokemonStore {
    async fn insert(&self, pokemon: &Pokemon) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(&pokemon.id) {
            return Err(StoreError::Backend(format!("id {} already in use", pokemon.id)));
        }
        check_unique(&entries, None, Some(&pokemon.name), Some(pokemon.no))?;

        entries.insert(
            pokemon.id,
            Entry {
                name: pokemon.name.clone(),
                no: pokemon.no,
                version: 0,
            },
        );
        debug!(id = %pokemon.id, "Inserted pokemon");
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Pokemon>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(id).map(|entry| entry.to_pokemon(*id)))
    }

    async fn find_page(&self, limit: u32, skip: u64) -> Result<Vec<Pokemon>, StoreError> {
        let entries = self.entries.read().await;
        let mut all: Vec<Pokemon> = entries
            .iter()
            .map(|(id, entry)| entry.to_pokemon(*id))
            .collect();
        all.sort_by_key(|pokemon| pokemon.no);

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        Ok(all.into_iter().skip(skip).take(limit as usize).collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.entries.read().await.len() as u64)
    }

    async fn update_by_id(
        &self,
        id: &ObjectId,
        patch: &UpdatePokemon,
    ) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(id) {
            return Ok(false);
        }
        check_unique(&entries, Some(id), patch.name.as_deref(), patch.no)?;

        let Some(entry) = entries.get_mut(id) else {
            return Ok(false);
        };
        if let Some(name) = &patch.name {
            entry.name = name.clone();
        }
        if let Some(no) = patch.no {
            entry.no = no;
        }
        entry.version += 1;
        debug!(id = %id, version = entry.version, "Updated pokemon");
        Ok(true)
    }

    async fn delete_by_id(&self, id: &ObjectId) -> Result<bool, StoreError> {
        Ok(self.entries.write().await.remove(id).is_some())
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut entries = self.entries.write().await;
        let removed = entries.len() as u64;
        entries.clear();
        Ok(removed)
    }

    async fn insert_many(&self, pokemon: &[Pokemon]) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;

        // Validate the whole batch first so a rejected batch leaves no partial writes.
        let mut names = HashSet::new();
        let mut numbers = HashSet::new();
        for p in pokemon {
            if entries.contains_key(&p.id) {
                return Err(StoreError::Backend(format!("id {} already in use", p.id)));
            }
            if !names.insert(p.name.as_str()) {
                return Err(StoreError::Duplicate(UniqueField::Name));
            }
            if !numbers.insert(p.no) {
                return Err(StoreError::Duplicate(UniqueField::No));
            }
            check_unique(&entries, None, Some(&p.name), Some(p.no))?;
        }

        for p in pokemon {
            entries.insert(
                p.id,
                Entry {
                    name: p.name.clone(),
                    no: p.no,
                    version: 0,
                },
            );
        }
        debug!(count = pokemon.len(), "Inserted pokemon batch");
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
