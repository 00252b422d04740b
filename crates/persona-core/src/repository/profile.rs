//! Profile store trait definition.

use std::future::Future;

use persona_types::error::RepositoryError;
use persona_types::profile::Profile;
use tokio::sync::watch;

/// Durable storage for the single user profile.
///
/// The store holds at most one profile and enforces that itself. Readers
/// observe it through `subscribe`, writers go through `upsert_singleton`.
///
/// Implementations live in persona-infra (e.g., SqliteProfileStore).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait ProfileStore: Send + Sync {
    /// Subscribe to the stored profile.
    ///
    /// The receiver's first read is the current value (`None` when no profile
    /// exists); every persisted change publishes a new value, in persistence
    /// order.
    fn subscribe(&self) -> watch::Receiver<Option<Profile>>;

    /// Read the stored profile, if any.
    fn get_singleton(
        &self,
    ) -> impl Future<Output = Result<Option<Profile>, RepositoryError>> + Send;

    /// Insert the profile when `profile.id` is `None`, otherwise update the
    /// record with that identity. Returns the persisted record, carrying the
    /// store-assigned identity after an insert.
    ///
    /// Fails with `RepositoryError::NotFound` when updating an identity the
    /// store does not hold, and with `RepositoryError::Conflict` when an
    /// insert would create a second profile.
    fn upsert_singleton(
        &self,
        profile: &Profile,
    ) -> impl Future<Output = Result<Profile, RepositoryError>> + Send;
}
