//! DraftState seeding and validation.
//!
//! `DraftState` lives in `persona-types`; this module provides an extension
//! trait (`DraftStateExt`) with the mutation rules the controller applies.
//! The extension trait pattern is used because Rust does not allow inherent
//! impls for types defined in another crate.

use persona_types::draft::{DraftState, FieldErrors};
use persona_types::profile::{Profile, ProfileField};

use super::validation::validate_field;

/// Per-field position in the edit state machine.
///
/// `Empty` is the blank case of `Invalid`; every update re-derives the state
/// from the current value alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Empty,
    Invalid,
    Valid,
}

/// Extension trait for `DraftState` mutation and validation.
pub trait DraftStateExt {
    /// Overwrite the draft from a store emission (`None` clears every field)
    /// and re-validate all fields.
    fn seed(&mut self, record: Option<&Profile>);

    /// Set one field and re-validate only that field.
    fn apply_field(&mut self, field: ProfileField, value: String);

    /// Re-validate one field from its current value.
    fn validate(&mut self, field: ProfileField);

    /// Re-validate every field.
    fn revalidate(&mut self);

    /// Where `field` currently sits in the state machine.
    fn field_state(&self, field: ProfileField) -> FieldState;
}

impl DraftStateExt for DraftState {
    fn seed(&mut self, record: Option<&Profile>) {
        let record = record.cloned().unwrap_or_default();
        self.identity = record.id;
        self.first_name = record.first_name;
        self.last_name = record.last_name;
        self.address = record.address;
        self.phone_number = record.phone_number;
        self.revalidate();
    }

    fn apply_field(&mut self, field: ProfileField, value: String) {
        *self.value_mut(field) = value;
        self.validate(field);
    }

    fn validate(&mut self, field: ProfileField) {
        let error = validate_field(field, self.value(field));
        self.errors.set(field, error);
    }

    fn revalidate(&mut self) {
        self.errors = FieldErrors::default();
        for field in ProfileField::ALL {
            self.validate(field);
        }
    }

    fn field_state(&self, field: ProfileField) -> FieldState {
        if self.value(field).trim().is_empty() {
            FieldState::Empty
        } else if validate_field(field, self.value(field)).is_some() {
            FieldState::Invalid
        } else {
            FieldState::Valid
        }
    }
}
