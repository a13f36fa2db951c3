//! Catalog seeding.
//!
//! Fetches a fixed page of entries from the external catalog, derives each
//! entry's `no` from its resource URL, and replaces the whole collection.

mod catalog;

pub use catalog::{no_from_url, CatalogEntry, CatalogPage};

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::http::{HttpAdapter, HttpError};
use crate::pokemon::{CreatePokemon, PokemonError, PokemonService};

/// Number of entries requested from the catalog.
pub const SEED_PAGE_SIZE: u32 = 10;

/// Message returned by a successful seed.
pub const SEED_CONFIRMATION: &str = "DB hydrated";

/// Seed failures.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The catalog could not be fetched or decoded.
    #[error("catalog request failed: {0}")]
    Catalog(#[from] HttpError),

    /// A catalog entry's URL does not end in a positive numeric id. The
    /// seed is aborted before the store is touched.
    #[error("catalog entry '{name}' has no positive numeric id in url '{url}'")]
    MalformedEntry { name: String, url: String },

    /// Replacing the collection failed.
    #[error(transparent)]
    Store(#[from] PokemonError),
}

/// Seeds the Pokemon collection from the catalog.
#[derive(Clone)]
pub struct SeedService {
    http: Arc<dyn HttpAdapter>,
    pokemon: PokemonService,
    catalog_url: String,
}

impl SeedService {
    /// Create a seed service reading from `catalog_url`
    /// (for example `https://pokeapi.co/api/v2`).
    pub fn new(http: Arc<dyn HttpAdapter>, pokemon: PokemonService, catalog_url: &str) -> Self {
        Self {
            http,
            pokemon,
            catalog_url: catalog_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the catalog page this service fetches.
    pub fn page_url(&self) -> String {
        format!("{}/pokemon?limit={SEED_PAGE_SIZE}", self.catalog_url)
    }

    /// Fetch the catalog page and replace the collection with it.
    pub async fn execute_seed(&self) -> Result<&'static str, SeedError> {
        let url = self.page_url();
        info!(url = %url, "Fetching seed catalog");

        let page: CatalogPage = self.http.get(&url).await?;
        let records = map_entries(page.results)?;

        info!(count = records.len(), "Hydrating pokemon from catalog");
        self.pokemon.hydrate_with_seed(records).await?;

        Ok(SEED_CONFIRMATION)
    }
}

/// Map catalog entries to create requests, failing on the first entry whose
/// URL carries no positive numeric id.
fn map_entries(entries: Vec<CatalogEntry>) -> Result<Vec<CreatePokemon>, SeedError> {
    entries
        .into_iter()
        .map(|CatalogEntry { name, url }| match no_from_url(&url) {
            Some(no) => Ok(CreatePokemon { name, no }),
            None => {
                warn!(name = %name, url = %url, "Malformed catalog entry, aborting seed");
                Err(SeedError::MalformedEntry { name, url })
            }
        })
        .collect()
}
