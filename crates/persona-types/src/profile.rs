use serde::{Deserialize, Serialize};

use std::fmt;

/// Stable identifier assigned by the profile store on first insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub i64);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The persisted user profile.
///
/// `id` is `None` until the store has persisted the record. Once persisted,
/// the store-assigned identity must be carried on every later update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Option<ProfileId>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone_number: String,
}

impl Profile {
    /// Build a not-yet-persisted profile.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            phone_number: phone_number.into(),
        }
    }

    /// Attach a store-assigned identity.
    pub fn with_id(mut self, id: ProfileId) -> Self {
        self.id = Some(id);
        self
    }

    /// "First Last", trimmed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn value(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FirstName => &self.first_name,
            ProfileField::LastName => &self.last_name,
            ProfileField::Address => &self.address,
            ProfileField::PhoneNumber => &self.phone_number,
        }
    }
}

/// The four editable fields of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    FirstName,
    LastName,
    Address,
    PhoneNumber,
}

impl ProfileField {
    /// All fields in form order.
    pub const ALL: [ProfileField; 4] = [
        ProfileField::FirstName,
        ProfileField::LastName,
        ProfileField::Address,
        ProfileField::PhoneNumber,
    ];

    /// Machine name (`first_name`, `phone_number`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            ProfileField::FirstName => "first_name",
            ProfileField::LastName => "last_name",
            ProfileField::Address => "address",
            ProfileField::PhoneNumber => "phone_number",
        }
    }

    /// Human label for forms.
    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::FirstName => "First name",
            ProfileField::LastName => "Last name",
            ProfileField::Address => "Address",
            ProfileField::PhoneNumber => "Phone number",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
