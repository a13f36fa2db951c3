//! The Pokemon resource: records, the storage seam, and the resource service.
//!
//! This module provides:
//! - Record and request types (`model`)
//! - The `PokemonStore` trait every storage backend implements
//! - An in-memory store for tests and local development
//! - `PokemonService`, which validates input and translates storage failures

mod error;
mod memory;
mod model;
mod service;
mod store;

pub use error::PokemonError;
pub use memory::MemoryPokemonStore;
pub use model::{CreatePokemon, Pagination, Pokemon, PokemonPage, UpdatePokemon};
pub use service::PokemonService;
pub use store::{PokemonStore, StoreError, UniqueField};
