use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::pokemon::PokemonError;
use crate::seed::SeedError;

#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl ProblemDetails {
    fn new(status: StatusCode, code: impl Into<String>, detail: impl Into<String>) -> Self {
        let code = code.into();
        let title = status
            .canonical_reason()
            .unwrap_or("Unknown Error")
            .to_string();
        Self {
            r#type: format!("https://pokedex.dev/problems/{code}"),
            title,
            status: status.as_u16(),
            detail: detail.into(),
            code,
            details: None,
        }
    }

    fn set_details(&mut self, details: Vec<FieldError>) {
        self.details = Some(details);
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub problem: Box<ProblemDetails>,
}

impl ApiError {
    fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        let problem = Box::new(ProblemDetails::new(status, code, message));
        Self { status, problem }
    }

    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    pub fn internal(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, message)
    }

    pub fn bad_gateway(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, code, message)
    }

    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.problem.set_details(details);
        self
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| FieldError {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::bad_request("invalid_argument", "Request validation failed").with_details(details)
    }
}

impl From<PokemonError> for ApiError {
    fn from(err: PokemonError) -> Self {
        match &err {
            PokemonError::InvalidArgument(_) => {
                ApiError::bad_request("invalid_argument", err.to_string())
            }
            PokemonError::DuplicateKey { .. } => {
                ApiError::bad_request("duplicate_key", err.to_string())
            }
            PokemonError::NotFound(_) => ApiError::not_found("not_found", err.to_string()),
            PokemonError::InternalFailure => {
                ApiError::internal("internal_error", "Internal server error")
            }
        }
    }
}

impl From<SeedError> for ApiError {
    fn from(err: SeedError) -> Self {
        match err {
            SeedError::Catalog(e) => {
                tracing::error!(error = %e, "Seed catalog request failed");
                ApiError::bad_gateway("catalog_unavailable", "Failed to fetch the seed catalog")
            }
            SeedError::MalformedEntry { .. } => {
                ApiError::bad_gateway("malformed_catalog_entry", err.to_string())
            }
            SeedError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.problem)).into_response();
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pokemon::UniqueField;

    #[test]
    fn test_duplicate_key_is_client_error() {
        let err: ApiError = PokemonError::DuplicateKey {
            field: UniqueField::Name,
            value: "pikachu".to_string(),
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.problem.code, "duplicate_key");
        assert_eq!(err.problem.detail, "Pokemon with name pikachu already exists");
    }

    #[test]
    fn test_not_found_names_id() {
        let err: ApiError = PokemonError::NotFound("65a1f0c2e4b0a1b2c3d4e5f6".to_string()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.problem.detail.contains("65a1f0c2e4b0a1b2c3d4e5f6"));
    }

    #[test]
    fn test_internal_failure_hides_detail() {
        let err: ApiError = PokemonError::InternalFailure.into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.problem.detail, "Internal server error");
    }

    #[test]
    fn test_malformed_seed_entry_is_bad_gateway() {
        let err: ApiError = SeedError::MalformedEntry {
            name: "glitch".to_string(),
            url: "https://pokeapi.co/api/v2/pokemon/abc/".to_string(),
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.problem.code, "malformed_catalog_entry");
    }

    #[test]
    fn test_response_content_type() {
        let response = ApiError::bad_request("invalid_id", "x is not a valid id").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );
    }
}
