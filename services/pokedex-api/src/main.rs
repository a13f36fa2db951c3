//! Pokedex API server.
//!
//! Serves CRUD endpoints for Pokemon records and a seed endpoint that
//! hydrates the store from the external catalog.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use pokedex_api::{
    api,
    config::{self, StoreBackend},
    db::Database,
    http::ReqwestAdapter,
    pokemon::{MemoryPokemonStore, PokemonService, PokemonStore},
    seed::SeedService,
    state::AppState,
};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize tracing (prefer RUST_LOG, fallback to POKEDEX_LOG_LEVEL)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting pokedex API");
    info!(
        listen_addr = %config.listen_addr,
        store = ?config.store,
        default_limit = config.default_limit,
        catalog_url = %config.catalog_url,
        "Configuration loaded"
    );

    let store: Arc<dyn PokemonStore> = match config.store {
        StoreBackend::Memory => {
            warn!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryPokemonStore::new())
        }
        StoreBackend::Postgres => {
            let db = match Database::connect(&config.database).await {
                Ok(db) => {
                    info!("Database connection established");
                    db
                }
                Err(e) => {
                    error!(error = %e, "Failed to connect to database");
                    return Err(e.into());
                }
            };

            // Run migrations in dev mode
            if config.dev_mode {
                info!("Running database migrations (dev mode)");
                if let Err(e) = db.run_migrations().await {
                    error!(error = %e, "Failed to run migrations");
                    return Err(e.into());
                }
            }

            Arc::new(db.pokemon_store())
        }
    };

    // Create application state
    let pokemon = PokemonService::new(store, config.default_limit);
    let seed = SeedService::new(
        Arc::new(ReqwestAdapter::new()),
        pokemon.clone(),
        &config.catalog_url,
    );
    let state = AppState::new(pokemon, seed);

    // Build and run the server
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %config.listen_addr, "Listening for connections");

    // Create shutdown channel for graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Spawn the server with graceful shutdown
    let mut server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let mut shutdown_rx = shutdown_rx;
                loop {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
                info!("HTTP server shutting down");
            })
            .await
    });

    // Wait for shutdown signal (Ctrl+C)
    let shutdown_requested = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
            true
        }
        result = &mut server_handle => {
            match result {
                Ok(Ok(())) => info!("Server exited normally"),
                Ok(Err(e)) => error!(error = %e, "Server error"),
                Err(e) => error!(error = %e, "Server task panicked"),
            }
            false
        }
    };

    if shutdown_requested {
        let _ = shutdown_tx.send(true);

        info!("Waiting for in-flight requests...");
        let shutdown_timeout = Duration::from_secs(10);
        if let Err(e) = tokio::time::timeout(shutdown_timeout, &mut server_handle).await {
            warn!(error = %e, "HTTP server did not shut down in time");
        }
    }

    info!("Pokedex API shutdown complete");
    Ok(())
}
