//! Record and request types for the Pokemon resource.

use pokedex_id::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A stored Pokemon.
///
/// The store's revision counter is internal and never part of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    /// System-generated identifier.
    pub id: ObjectId,

    /// Unique name.
    pub name: String,

    /// Unique catalog ordinal.
    pub no: i32,
}

/// Request to create a new Pokemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreatePokemon {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    #[validate(range(min = 1, message = "no must be a positive integer"))]
    pub no: i32,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UpdatePokemon {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "no must be a positive integer"))]
    pub no: Option<i32>,
}

impl UpdatePokemon {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.no.is_none()
    }
}

/// Pagination window for listing.
///
/// `offset` is a zero-based page index, not a row offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Pagination {
    #[validate(range(min = 1, message = "limit must be at least 1"))]
    pub limit: Option<u32>,

    pub offset: Option<u32>,
}

/// One page of Pokemon, sorted ascending by `no`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonPage {
    pub data: Vec<Pokemon>,

    /// Number of pages at the effective limit.
    pub pages: u64,

    /// Size of the whole collection, independent of the window.
    pub total_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_serializes_camel_case() {
        let page = PokemonPage {
            data: vec![],
            pages: 0,
            total_count: 0,
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json, serde_json::json!({"data": [], "pages": 0, "totalCount": 0}));
    }

    #[test]
    fn test_update_accepts_partial_body() {
        let patch: UpdatePokemon = serde_json::from_str(r#"{"no": 25}"#).unwrap();
        assert_eq!(patch.name, None);
        assert_eq!(patch.no, Some(25));
        assert!(!patch.is_empty());
        assert!(UpdatePokemon::default().is_empty());
    }

    #[test]
    fn test_create_validation() {
        let ok = CreatePokemon {
            name: "pikachu".to_string(),
            no: 25,
        };
        assert!(ok.validate().is_ok());

        let empty_name = CreatePokemon {
            name: String::new(),
            no: 25,
        };
        assert!(empty_name.validate().is_err());

        let zero_no = CreatePokemon {
            name: "pikachu".to_string(),
            no: 0,
        };
        assert!(zero_no.validate().is_err());
    }

    #[test]
    fn test_pagination_rejects_zero_limit() {
        let pagination = Pagination {
            limit: Some(0),
            offset: None,
        };
        assert!(pagination.validate().is_err());
        assert!(Pagination::default().validate().is_ok());
    }
}
