//! Pokedex API library.
//!
//! This crate primarily ships a `pokedex-api` binary, but we expose a small
//! library surface to enable integration testing and reuse.

pub mod api;
pub mod config;
pub mod db;
pub mod http;
pub mod pokemon;
pub mod seed;
pub mod state;
