//! `persona show`.

use anyhow::Result;
use console::style;
use persona_core::repository::profile::ProfileStore;
use persona_core::service::bootstrap::BootstrapOutcome;

use crate::cli::render;
use crate::state::AppState;

/// Print the stored profile, or a hint when there is none yet.
pub async fn show_profile(state: &AppState, json: bool) -> Result<()> {
    let profile = state.store.get_singleton().await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&render::profile_json(profile.as_ref()))?
        );
        return Ok(());
    }

    if matches!(state.bootstrap, BootstrapOutcome::Seeded(_)) {
        println!();
        println!(
            "  {}",
            style("First run: a default profile was created. Edit it with `persona edit`.").dim()
        );
    }

    match profile {
        Some(profile) => render::print_profile(&profile),
        None => {
            println!();
            println!("  {}", style("No profile yet.").yellow());
            println!(
                "  Create one with: {}",
                style("persona edit").cyan()
            );
            println!();
        }
    }
    Ok(())
}
