//! Editable draft of the profile plus its validation state.
//!
//! `DraftState` lives here so the presentation layer can render snapshots
//! without depending on the controller. Seeding and validation logic lives in
//! `persona-core` (`DraftStateExt`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::{Profile, ProfileField, ProfileId};

/// A per-field validation failure. Held as data on the draft, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    #[error("required")]
    Required,

    #[error("invalid format")]
    InvalidFormat,
}

impl FieldError {
    /// Inline message shown next to `field` in a form.
    pub fn message(&self, field: ProfileField) -> String {
        match self {
            FieldError::Required => format!("{} cannot be empty", field.label()),
            FieldError::InvalidFormat => format!("{} has an invalid format", field.label()),
        }
    }
}

/// Current error for each field. `None` means the field passed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    pub first_name: Option<FieldError>,
    pub last_name: Option<FieldError>,
    pub address: Option<FieldError>,
    pub phone_number: Option<FieldError>,
}

impl FieldErrors {
    pub fn get(&self, field: ProfileField) -> Option<FieldError> {
        match field {
            ProfileField::FirstName => self.first_name,
            ProfileField::LastName => self.last_name,
            ProfileField::Address => self.address,
            ProfileField::PhoneNumber => self.phone_number,
        }
    }

    pub fn set(&mut self, field: ProfileField, error: Option<FieldError>) {
        match field {
            ProfileField::FirstName => self.first_name = error,
            ProfileField::LastName => self.last_name = error,
            ProfileField::Address => self.address = error,
            ProfileField::PhoneNumber => self.phone_number = error,
        }
    }

    /// Whether every field is free of errors.
    pub fn is_clear(&self) -> bool {
        ProfileField::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Fields that currently carry an error, in form order.
    pub fn failing(&self) -> Vec<(ProfileField, FieldError)> {
        ProfileField::ALL
            .iter()
            .filter_map(|f| self.get(*f).map(|e| (*f, e)))
            .collect()
    }
}

/// In-memory working copy of the profile.
///
/// `identity` is the identity the editor currently knows for the persisted
/// record: `None` until the store has a profile. Validity is never stored;
/// see [`DraftState::is_valid`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftState {
    pub identity: Option<ProfileId>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone_number: String,
    pub errors: FieldErrors,
}

impl DraftState {
    pub fn value(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FirstName => &self.first_name,
            ProfileField::LastName => &self.last_name,
            ProfileField::Address => &self.address,
            ProfileField::PhoneNumber => &self.phone_number,
        }
    }

    pub fn value_mut(&mut self, field: ProfileField) -> &mut String {
        match field {
            ProfileField::FirstName => &mut self.first_name,
            ProfileField::LastName => &mut self.last_name,
            ProfileField::Address => &mut self.address,
            ProfileField::PhoneNumber => &mut self.phone_number,
        }
    }

    pub fn error(&self, field: ProfileField) -> Option<FieldError> {
        self.errors.get(field)
    }

    /// Whether the draft may be saved.
    ///
    /// True iff no field carries an error AND every raw value is non-blank.
    /// The blank check is deliberately redundant with the required-field
    /// errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_clear()
            && ProfileField::ALL
                .iter()
                .all(|f| !self.value(*f).trim().is_empty())
    }

    /// Canonical record for this draft, carrying the known identity.
    pub fn to_profile(&self) -> Profile {
        Profile {
            id: self.identity,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            address: self.address.clone(),
            phone_number: self.phone_number.clone(),
        }
    }
}
