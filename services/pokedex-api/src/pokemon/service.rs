//! Pokemon resource service.
//!
//! Orchestrates validation, store access, and duplicate-key translation for
//! the CRUD operations, plus the bulk replace used by seeding.

use std::sync::Arc;

use pokedex_id::ObjectId;
use tracing::{error, info};
use validator::Validate;

use super::{
    CreatePokemon, Pagination, Pokemon, PokemonError, PokemonPage, PokemonStore, StoreError,
    UniqueField, UpdatePokemon,
};

/// Resource service over an injected store.
#[derive(Clone)]
pub struct PokemonService {
    store: Arc<dyn PokemonStore>,
    default_limit: u32,
}

impl PokemonService {
    /// Create a service. `default_limit` is used when a listing request
    /// carries no limit.
    pub fn new(store: Arc<dyn PokemonStore>, default_limit: u32) -> Self {
        Self {
            store,
            default_limit: default_limit.max(1),
        }
    }

    /// Persist a new Pokemon.
    pub async fn create(&self, input: CreatePokemon) -> Result<Pokemon, PokemonError> {
        input.validate()?;

        let pokemon = Pokemon {
            id: ObjectId::new(),
            name: input.name,
            no: input.no,
        };

        self.store.insert(&pokemon).await.map_err(|e| {
            translate_store_error(e, "create", Some(&pokemon.name), Some(pokemon.no))
        })?;

        info!(id = %pokemon.id, name = %pokemon.name, no = pokemon.no, "Created pokemon");
        Ok(pokemon)
    }

    /// List one page of Pokemon, ascending by `no`.
    pub async fn find_all(&self, pagination: Pagination) -> Result<PokemonPage, PokemonError> {
        pagination.validate()?;

        let limit = pagination.limit.unwrap_or(self.default_limit);
        let offset = pagination.offset.unwrap_or(0);
        let skip = u64::from(offset) * u64::from(limit);

        let data = self
            .store
            .find_page(limit, skip)
            .await
            .map_err(|e| translate_store_error(e, "find_all", None, None))?;
        let total_count = self
            .store
            .count()
            .await
            .map_err(|e| translate_store_error(e, "find_all", None, None))?;

        Ok(PokemonPage {
            data,
            pages: total_count.div_ceil(u64::from(limit)),
            total_count,
        })
    }

    /// Fetch a single Pokemon by id.
    pub async fn find_one(&self, id: &str) -> Result<Pokemon, PokemonError> {
        let object_id = parse_id(id)?;

        self.store
            .find_by_id(&object_id)
            .await
            .map_err(|e| translate_store_error(e, "find_one", None, None))?
            .ok_or_else(|| PokemonError::NotFound(id.to_string()))
    }

    /// Apply a partial update and return the record as re-read afterwards.
    ///
    /// A record deleted between the write and the re-read surfaces as
    /// `NotFound`.
    pub async fn update(&self, id: &str, patch: UpdatePokemon) -> Result<Pokemon, PokemonError> {
        let object_id = parse_id(id)?;
        patch.validate()?;

        self.store
            .update_by_id(&object_id, &patch)
            .await
            .map_err(|e| translate_store_error(e, "update", patch.name.as_deref(), patch.no))?;

        self.find_one(id).await
    }

    /// Delete a Pokemon. Fails with `NotFound` if it does not exist.
    pub async fn remove(&self, id: &str) -> Result<(), PokemonError> {
        let pokemon = self.find_one(id).await?;

        self.store
            .delete_by_id(&pokemon.id)
            .await
            .map_err(|e| translate_store_error(e, "remove", None, None))?;

        info!(id = %pokemon.id, "Removed pokemon");
        Ok(())
    }

    /// Replace the whole collection with `records`.
    ///
    /// Records are not validated individually. The delete and the insert are
    /// separate store calls: a failure in between leaves the store empty.
    pub async fn hydrate_with_seed(&self, records: Vec<CreatePokemon>) -> Result<(), PokemonError> {
        let pokemon: Vec<Pokemon> = records
            .into_iter()
            .map(|record| Pokemon {
                id: ObjectId::new(),
                name: record.name,
                no: record.no,
            })
            .collect();

        let removed = self
            .store
            .delete_all()
            .await
            .map_err(|e| translate_store_error(e, "hydrate_with_seed", None, None))?;

        self.store
            .insert_many(&pokemon)
            .await
            .map_err(|e| translate_store_error(e, "hydrate_with_seed", None, None))?;

        info!(removed, inserted = pokemon.len(), "Replaced pokemon collection");
        Ok(())
    }

    /// Check that the store is reachable.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }
}

fn parse_id(id: &str) -> Result<ObjectId, PokemonError> {
    ObjectId::parse(id)
        .map_err(|_| PokemonError::InvalidArgument(format!("Id {id} is not a valid id")))
}

/// Classify a store failure. Duplicates name the offending field with the
/// value the caller tried to write; everything else is logged and hidden.
fn translate_store_error(
    err: StoreError,
    operation: &'static str,
    name: Option<&str>,
    no: Option<i32>,
) -> PokemonError {
    match err {
        StoreError::Duplicate(field) => {
            let value = match field {
                UniqueField::Name => name.map(str::to_string),
                UniqueField::No => no.map(|no| no.to_string()),
            };
            match value {
                Some(value) => PokemonError::DuplicateKey { field, value },
                None => {
                    error!(operation, field = %field, "Duplicate key without a matching input value");
                    PokemonError::InternalFailure
                }
            }
        }
        StoreError::Backend(message) => {
            error!(operation, error = %message, "Pokemon store failure");
            PokemonError::InternalFailure
        }
    }
}
