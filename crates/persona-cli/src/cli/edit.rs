//! `persona edit`: drive the profile editor from flags or an interactive form.

use anyhow::{Result, bail};
use clap::Args;
use console::style;
use dialoguer::{Confirm, Input};
use persona_core::edit::{ProfileEditController, SaveOutcome};
use persona_infra::sqlite::profile::SqliteProfileStore;
use persona_types::profile::ProfileField;

use crate::cli::render;
use crate::state::AppState;

#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// New first name.
    #[arg(long)]
    pub first_name: Option<String>,

    /// New last name.
    #[arg(long)]
    pub last_name: Option<String>,

    /// New address.
    #[arg(long)]
    pub address: Option<String>,

    /// New phone number (10-15 digits, optional leading '+').
    #[arg(long = "phone-number", visible_alias = "phone")]
    pub phone_number: Option<String>,

    /// Validate the edits without saving.
    #[arg(long)]
    pub dry_run: bool,
}

impl EditArgs {
    /// Field edits given on the command line, in form order.
    pub fn updates(&self) -> Vec<(ProfileField, &str)> {
        [
            (ProfileField::FirstName, &self.first_name),
            (ProfileField::LastName, &self.last_name),
            (ProfileField::Address, &self.address),
            (ProfileField::PhoneNumber, &self.phone_number),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

/// Edit the profile. Flags apply non-interactively; without any, a form
/// walks through every field.
pub async fn edit_profile(state: &AppState, args: EditArgs, json: bool, quiet: bool) -> Result<()> {
    let mut controller = ProfileEditController::new(state.store.clone());
    controller.initialize();

    let updates = args.updates();
    if updates.is_empty() {
        if json {
            bail!("interactive editing is not available with --json; pass field flags instead");
        }
        if !run_form(&controller)? {
            println!("  {}", style("Edit cancelled.").dim());
            controller.close();
            return Ok(());
        }
    } else {
        for (field, value) in updates {
            controller.update_field(field, value);
        }
    }

    if args.dry_run {
        let draft = controller.snapshot();
        controller.close();
        return report_dry_run(&draft, json);
    }

    let outcome = controller.save().await;
    let draft = controller.snapshot();
    controller.close();

    match outcome? {
        SaveOutcome::Saved(profile) => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&render::profile_json(Some(&profile)))?
                );
            } else if !quiet {
                println!(
                    "\n  {} Profile saved for {}",
                    style("✓").green().bold(),
                    style(profile.display_name()).cyan().bold()
                );
                render::print_profile(&profile);
            }
            Ok(())
        }
        SaveOutcome::NotValid => {
            if json {
                println!("{}", serde_json::to_string_pretty(&render::draft_json(&draft))?);
            } else {
                render::print_draft(&draft);
            }
            bail!("profile not saved: fix the fields above and try again")
        }
    }
}

fn report_dry_run(draft: &persona_types::draft::DraftState, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&render::draft_json(draft))?);
    } else {
        render::print_draft(draft);
        if draft.is_valid() {
            println!("  {}", style("Dry run: the draft is valid, nothing saved.").dim());
        }
    }
    if !draft.is_valid() {
        bail!("draft is not valid");
    }
    Ok(())
}

/// Prompt for each field, pre-filled with the draft value. A field is
/// re-prompted until it passes validation. Returns whether the user
/// confirmed the save.
fn run_form(controller: &ProfileEditController<SqliteProfileStore>) -> Result<bool> {
    println!();
    println!("  {}", style("Edit profile").cyan().bold());
    println!();

    for field in ProfileField::ALL {
        loop {
            let current = controller.snapshot().value(field).to_string();
            let value: String = Input::new()
                .with_prompt(field.label())
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()?;

            controller.update_field(field, value);

            match controller.snapshot().error(field) {
                Some(error) => println!("  {}", style(error.message(field)).red()),
                None => break,
            }
        }
    }

    render::print_draft(&controller.snapshot());

    let confirmed = Confirm::new()
        .with_prompt("Save profile?")
        .default(true)
        .interact()?;
    Ok(confirmed)
}
