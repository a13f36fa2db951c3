//! # pokedex-id
//!
//! Document identifier type, parsing, and validation for the pokedex service.
//!
//! ## ID Format
//!
//! Record IDs are 12-byte object ids rendered as 24 lowercase hex characters:
//!
//! - `65a1f0c2e4b0a1b2c3d4e5f6`
//!
//! The 12 bytes are laid out as:
//! - 4 bytes: seconds since the Unix epoch (big-endian)
//! - 5 bytes: random value chosen once per process
//! - 3 bytes: counter starting at a random value (big-endian, wrapping)
//!
//! IDs generated by the same process are therefore roughly time-ordered.
//! Parsing accepts upper- or lowercase hex and always normalizes to lowercase.

mod error;
mod object_id;

pub use error::IdError;
pub use object_id::{is_valid, ObjectId};
