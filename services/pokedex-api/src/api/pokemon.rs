//! Pokemon API endpoints.
//!
//! Maps HTTP verbs to resource-service calls one-to-one. Path ids are
//! checked by `ObjectIdParam` before a handler body runs.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::api::error::ApiError;
use crate::api::extract::{ObjectIdParam, ValidatedJson, ValidatedQuery};
use crate::pokemon::{CreatePokemon, Pagination, UpdatePokemon};
use crate::state::AppState;

/// Create pokemon routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_pokemon).get(list_pokemon))
        .route(
            "/{id}",
            get(get_pokemon).put(update_pokemon).delete(delete_pokemon),
        )
}

/// Create a new Pokemon.
///
/// POST /pokemon
async fn create_pokemon(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreatePokemon>,
) -> Result<impl IntoResponse, ApiError> {
    let pokemon = state.pokemon().create(req).await?;
    Ok((StatusCode::CREATED, Json(pokemon)))
}

/// List Pokemon, one page at a time.
///
/// GET /pokemon?limit=&offset=
async fn list_pokemon(
    State(state): State<AppState>,
    ValidatedQuery(pagination): ValidatedQuery<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.pokemon().find_all(pagination).await?;
    Ok(Json(page))
}

/// Get a single Pokemon by ID.
///
/// GET /pokemon/{id}
async fn get_pokemon(
    State(state): State<AppState>,
    ObjectIdParam(id): ObjectIdParam,
) -> Result<impl IntoResponse, ApiError> {
    let pokemon = state.pokemon().find_one(&id).await?;
    Ok(Json(pokemon))
}

/// Update a Pokemon.
///
/// PUT /pokemon/{id}
async fn update_pokemon(
    State(state): State<AppState>,
    ObjectIdParam(id): ObjectIdParam,
    ValidatedJson(patch): ValidatedJson<UpdatePokemon>,
) -> Result<impl IntoResponse, ApiError> {
    let pokemon = state.pokemon().update(&id, patch).await?;
    Ok(Json(pokemon))
}

/// Delete a Pokemon.
///
/// DELETE /pokemon/{id}
async fn delete_pokemon(
    State(state): State<AppState>,
    ObjectIdParam(id): ObjectIdParam,
) -> Result<impl IntoResponse, ApiError> {
    state.pokemon().remove(&id).await?;
    Ok(StatusCode::OK)
}
