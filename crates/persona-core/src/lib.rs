//! Profile editing logic and store trait definitions for Persona.
//!
//! This crate defines the "ports" (store traits) that the infrastructure
//! layer implements, plus the edit controller that drives a profile form.
//! It depends only on `persona-types` -- never on `persona-infra` or any
//! database/IO crate.

pub mod edit;
pub mod feed;
pub mod repository;
pub mod service;
