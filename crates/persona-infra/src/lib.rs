//! Infrastructure layer for Persona.
//!
//! Contains implementations of the store traits defined in `persona-core`
//! (SQLite), plus data directory resolution and `config.toml` loading.

pub mod config;
pub mod sqlite;
