//! Seed endpoint.

use axum::{extract::State, routing::get, Router};

use crate::api::error::ApiError;
use crate::state::AppState;

/// Create seed routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(execute_seed))
}

/// Replace the collection with the catalog's first page.
///
/// GET /seed
async fn execute_seed(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    Ok(state.seed().execute_seed().await?)
}
