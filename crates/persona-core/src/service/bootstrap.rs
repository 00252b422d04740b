//! First-run bootstrap.
//!
//! Seeding a default profile into an empty store is a policy step the
//! application runs once at startup, before any view or editor subscribes.
//! It is never part of the store's read path.

use persona_types::error::RepositoryError;
use persona_types::profile::Profile;

use crate::repository::profile::ProfileStore;

/// What the bootstrap step found or did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// A profile was already stored; nothing was written.
    Existing(Profile),
    /// The store was empty and the seed profile was inserted.
    Seeded(Profile),
    /// The store is empty and no seed was configured.
    Empty,
}

/// Insert `seed` when the store holds no profile.
///
/// The seed is inserted as a new record regardless of any identity it
/// carries.
pub async fn bootstrap_profile<S: ProfileStore>(
    store: &S,
    seed: Option<Profile>,
) -> Result<BootstrapOutcome, RepositoryError> {
    if let Some(existing) = store.get_singleton().await? {
        tracing::debug!(id = ?existing.id, "profile already present, skipping bootstrap");
        return Ok(BootstrapOutcome::Existing(existing));
    }

    let Some(mut seed) = seed else {
        tracing::debug!("no profile stored and bootstrap disabled");
        return Ok(BootstrapOutcome::Empty);
    };

    seed.id = None;
    let saved = store.upsert_singleton(&seed).await?;
    tracing::info!(id = ?saved.id, "seeded default profile on first run");
    Ok(BootstrapOutcome::Seeded(saved))
}
