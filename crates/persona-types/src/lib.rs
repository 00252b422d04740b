//! Shared domain types for Persona.
//!
//! This crate contains the domain types used across the workspace: the
//! persisted `Profile` record, the editable `DraftState`, configuration, and
//! the error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod draft;
pub mod error;
pub mod profile;
