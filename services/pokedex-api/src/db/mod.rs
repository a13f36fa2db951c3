//! Postgres persistence for the Pokemon collection.
//!
//! `Database` owns the connection pool and the runtime migrations;
//! `PgPokemonStore` is the `PokemonStore` implementation built on top of it.

mod error;
mod pokemon_store;

pub use error::DbError;
pub use pokemon_store::PgPokemonStore;

use std::path::PathBuf;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

/// How long a request waits for a pooled connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool settings. Populated from `DATABASE_URL` and `DB_*_CONNECTIONS`
/// by `Config::from_env`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/pokedex".to_string(),
            max_connections: 10,
            min_connections: 1,
        }
    }
}

/// Connected pool plus migrations.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to database"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(&config.database_url)
            .await
            .map_err(DbError::Connect)?;

        Ok(Self { pool })
    }

    /// Apply the `migrations/` directory shipped with this crate.
    ///
    /// The directory is looked up relative to the working directory first
    /// (running from the crate or the workspace root), then at the crate's
    /// build-time location.
    pub async fn run_migrations(&self) -> Result<(), DbError> {
        let candidates = migration_dirs();
        let dir = candidates
            .iter()
            .find(|dir| dir.is_dir())
            .ok_or_else(|| DbError::MigrationDirNotFound {
                tried: candidates
                    .iter()
                    .map(|dir| dir.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;

        debug!(migrations_dir = %dir.display(), "Loading migrations");
        let migrator = Migrator::new(dir.clone())
            .await
            .map_err(DbError::Migration)?;
        migrator.run(&self.pool).await.map_err(DbError::Migration)?;

        info!(migrations_dir = %dir.display(), "Database migrations complete");
        Ok(())
    }

    pub fn pokemon_store(&self) -> PgPokemonStore {
        PgPokemonStore::new(self.pool.clone())
    }
}

fn migration_dirs() -> [PathBuf; 3] {
    [
        PathBuf::from("migrations"),
        PathBuf::from("services/pokedex-api/migrations"),
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations"),
    ]
}
