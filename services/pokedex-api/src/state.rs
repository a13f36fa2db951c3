//! Application state shared across request handlers.

use std::sync::Arc;

use crate::pokemon::PokemonService;
use crate::seed::SeedService;

/// Shared application state.
///
/// This is passed to all request handlers via Axum's state extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pokemon: PokemonService,
    seed: SeedService,
}

impl AppState {
    /// Create a new application state.
    pub fn new(pokemon: PokemonService, seed: SeedService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { pokemon, seed }),
        }
    }

    /// Get the Pokemon resource service.
    pub fn pokemon(&self) -> &PokemonService {
        &self.inner.pokemon
    }

    /// Get the seed service.
    pub fn seed(&self) -> &SeedService {
        &self.inner.seed
    }
}
