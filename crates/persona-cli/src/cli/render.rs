//! Styled terminal output and JSON shapes shared by the commands.

use console::style;
use persona_core::edit::{DraftStateExt, FieldState};
use persona_types::draft::DraftState;
use persona_types::profile::{Profile, ProfileField};
use serde_json::{Map, Value, json};

/// Print a stored profile as a details block.
pub fn print_profile(profile: &Profile) {
    println!();
    println!("  {}", style(profile.display_name()).cyan().bold());
    println!();
    println!("  {}", style("── Details ──").dim());
    for field in ProfileField::ALL {
        println!(
            "  {} {}",
            style(format!("{:<14}", format!("{}:", field.label()))).bold(),
            profile.value(field)
        );
    }
    if let Some(id) = profile.id {
        println!("  {} {}", style(format!("{:<14}", "ID:")).bold(), style(id).dim());
    }
    println!();
}

/// Print the draft with an inline marker per field.
pub fn print_draft(draft: &DraftState) {
    println!();
    println!("  {}", style("── Draft ──").dim());
    for field in ProfileField::ALL {
        let value = draft.value(field);
        let marker = match draft.field_state(field) {
            FieldState::Valid => style("✓").green(),
            FieldState::Empty | FieldState::Invalid => style("✗").red(),
        };
        println!(
            "  {} {} {}",
            marker,
            style(format!("{:<14}", format!("{}:", field.label()))).bold(),
            value
        );
        if let Some(error) = draft.error(field) {
            println!("      {}", style(error.message(field)).red());
        }
    }
    println!();
}

/// JSON body for `show`. `null` profile when nothing is stored.
pub fn profile_json(profile: Option<&Profile>) -> Value {
    json!({ "profile": profile })
}

/// JSON body describing a draft: values, per-field errors and overall validity.
pub fn draft_json(draft: &DraftState) -> Value {
    let mut errors = Map::new();
    for (field, error) in draft.errors.failing() {
        errors.insert(field.name().to_string(), json!(error.message(field)));
    }
    json!({
        "id": draft.identity,
        "first_name": draft.first_name,
        "last_name": draft.last_name,
        "address": draft.address,
        "phone_number": draft.phone_number,
        "errors": errors,
        "valid": draft.is_valid(),
    })
}
