//! Profile edit state machine.
//!
//! `validation` holds the pure field rules, `draft` applies them to a
//! `DraftState`, and `controller` keeps one draft in sync with a
//! `ProfileStore`.

pub mod controller;
pub mod draft;
pub mod validation;

pub use controller::{ProfileEditController, SaveOutcome};
pub use draft::{DraftStateExt, FieldState};
