//! Request extractors that validate input before a handler runs.
//!
//! Each extractor rejects with an `ApiError`, so a malformed id, body, or
//! query never reaches the resource service.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::api::error::ApiError;

/// The `{id}` path parameter, checked to be a well-formed object id.
#[derive(Debug, Clone)]
pub struct ObjectIdParam(pub String);

impl<S> FromRequestParts<S> for ObjectIdParam
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request("invalid_id", rejection.body_text()))?;

        if !pokedex_id::is_valid(&value) {
            return Err(ApiError::bad_request(
                "invalid_id",
                format!("{value} is not a valid id"),
            ));
        }

        Ok(Self(value))
    }
}

/// A JSON body that deserialized and passed its `Validate` rules.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request("invalid_body", rejection.body_text()))?;

        value.validate()?;
        Ok(Self(value))
    }
}

/// Query parameters that deserialized and passed their `Validate` rules.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request("invalid_query", rejection.body_text()))?;

        value.validate()?;
        Ok(Self(value))
    }
}
