use std::net::SocketAddr;

use anyhow::{bail, Context, Result};

use crate::db::DbConfig;

/// Default catalog used for seeding.
pub const DEFAULT_CATALOG_URL: &str = "https://pokeapi.co/api/v2";

/// Which `PokemonStore` implementation to run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "memory" | "mem" => Ok(Self::Memory),
            other => bail!("unknown store backend '{other}' (expected 'postgres' or 'memory')"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub log_level: String,
    pub dev_mode: bool,
    pub store: StoreBackend,
    pub default_limit: u32,
    pub catalog_url: String,
    pub database: DbConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let listen_addr = std::env::var("POKEDEX_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .context("POKEDEX_LISTEN_ADDR must be a socket address (e.g. 127.0.0.1:3000).")?;

        let log_level = std::env::var("POKEDEX_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let dev_mode = std::env::var("POKEDEX_DEV")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        let store = std::env::var("POKEDEX_STORE")
            .ok()
            .map(|v| v.parse::<StoreBackend>())
            .transpose()?
            .unwrap_or(StoreBackend::Postgres);

        let default_limit: u32 = std::env::var("POKEDEX_DEFAULT_LIMIT")
            .ok()
            .map(|v| v.parse())
            .transpose()
            .context("POKEDEX_DEFAULT_LIMIT must be a positive integer.")?
            .unwrap_or(10);
        if default_limit == 0 {
            bail!("POKEDEX_DEFAULT_LIMIT must be a positive integer.");
        }

        let catalog_url = std::env::var("POKEDEX_CATALOG_URL")
            .unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string());

        let defaults = DbConfig::default();
        let database = DbConfig {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: env_u32("DB_MAX_CONNECTIONS")?.unwrap_or(defaults.max_connections),
            min_connections: env_u32("DB_MIN_CONNECTIONS")?.unwrap_or(defaults.min_connections),
        };

        Ok(Self {
            listen_addr,
            log_level,
            dev_mode,
            store,
            default_limit,
            catalog_url,
            database,
        })
    }
}

fn env_u32(key: &str) -> Result<Option<u32>> {
    std::env::var(key)
        .ok()
        .map(|v| v.parse::<u32>())
        .transpose()
        .with_context(|| format!("{key} must be a non-negative integer."))
}
