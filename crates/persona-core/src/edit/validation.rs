//! Field validation rules.
//!
//! Every rule is a pure function of one string. Blank input always yields
//! `FieldError::Required`, which takes precedence over format checks.

use std::sync::LazyLock;

use persona_types::draft::FieldError;
use persona_types::profile::ProfileField;
use regex::Regex;

/// Optional leading `+`, then 10 to 15 ASCII digits.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("phone pattern compiles"));

/// `Required` when `value` is empty after trimming whitespace.
pub fn validate_required(value: &str) -> Option<FieldError> {
    if value.trim().is_empty() {
        Some(FieldError::Required)
    } else {
        None
    }
}

/// `Required` when blank, `InvalidFormat` when not a 10-15 digit number with
/// an optional leading `+`.
pub fn validate_phone(value: &str) -> Option<FieldError> {
    validate_required(value).or_else(|| {
        if PHONE_PATTERN.is_match(value) {
            None
        } else {
            Some(FieldError::InvalidFormat)
        }
    })
}

/// Apply the rule for `field` to `value`.
pub fn validate_field(field: ProfileField, value: &str) -> Option<FieldError> {
    match field {
        ProfileField::FirstName | ProfileField::LastName | ProfileField::Address => {
            validate_required(value)
        }
        ProfileField::PhoneNumber => validate_phone(value),
    }
}
