//! Catalog response shapes.

use serde::Deserialize;

/// One page of the catalog's `/pokemon` listing. Fields other than
/// `results` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPage {
    pub results: Vec<CatalogEntry>,
}

/// A named resource in the catalog listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub url: String,
}

/// Derive the catalog ordinal from an entry URL.
///
/// The catalog encodes the id as the second-to-last `/`-separated segment,
/// e.g. `https://pokeapi.co/api/v2/pokemon/7/` yields 7. Ordinals start at
/// 1, so zero and negative segments are rejected like non-numeric ones.
pub fn no_from_url(url: &str) -> Option<i32> {
    let segments: Vec<&str> = url.split('/').collect();
    let segment = segments.len().checked_sub(2).map(|i| segments[i])?;
    segment.parse().ok().filter(|no| *no >= 1)
}
