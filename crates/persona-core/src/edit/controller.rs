//! Profile edit controller.
//!
//! Owns the single authoritative `DraftState`, keeps it seeded from a
//! `ProfileStore` subscription, validates on every mutation, and commits a
//! valid draft back to the store on save.
//!
//! The draft is held in a `watch` channel: every mutation is applied with
//! `send_modify`, so the presentation layer only ever observes complete
//! snapshots, and `save` reads the draft after all preceding `update_field`
//! calls.
//!
//! The store re-publishes every write, including the controller's own. Those
//! echoes are recognised through [`PendingCommits`] and only update the known
//! identity, so edits made after `save` returns are never rolled back.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use persona_types::draft::DraftState;
use persona_types::error::EditError;
use persona_types::profile::{Profile, ProfileField};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::repository::profile::ProfileStore;

use super::draft::DraftStateExt;

/// Result of a save attempt that reached a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The store confirmed the write. Carries the persisted record.
    Saved(Profile),
    /// The draft failed validation; nothing was written.
    NotValid,
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }
}

/// Edit controller for the single profile.
///
/// Generic over the store trait -- persona-core never depends on
/// persona-infra. Expects a single caller: it takes no locks beyond the
/// draft channel itself.
pub struct ProfileEditController<S: ProfileStore + 'static> {
    store: Arc<S>,
    draft: Arc<watch::Sender<DraftState>>,
    pending: Arc<PendingCommits>,
    cancel: CancellationToken,
    subscription: Option<JoinHandle<()>>,
    /// Cancels the subscription when the controller is dropped.
    _teardown: DropGuard,
}

impl<S: ProfileStore + 'static> ProfileEditController<S> {
    /// Create a controller with an empty, invalid draft. Call
    /// [`initialize`](Self::initialize) to start following the store.
    pub fn new(store: Arc<S>) -> Self {
        let (draft, _) = watch::channel(DraftState::default());
        let cancel = CancellationToken::new();
        let teardown = cancel.clone().drop_guard();
        Self {
            store,
            draft: Arc::new(draft),
            pending: Arc::default(),
            cancel,
            subscription: None,
            _teardown: teardown,
        }
    }

    /// Subscribe to the store.
    ///
    /// The current stored value is applied before this returns. Later
    /// emissions are applied by a background task, one at a time; each one
    /// replaces unsaved edits, except the echo of this controller's own
    /// save, which only sets the identity.
    ///
    /// Must be called from within a Tokio runtime. Calling it again, or
    /// after [`close`](Self::close), does nothing.
    pub fn initialize(&mut self) {
        if self.subscription.is_some() || self.cancel.is_cancelled() {
            tracing::debug!("profile editor already initialized or closed");
            return;
        }

        let mut records = self.store.subscribe();
        let current = records.borrow_and_update().clone();
        apply_emission(&self.draft, current.as_ref());

        let draft = Arc::clone(&self.draft);
        let pending = Arc::clone(&self.pending);
        let cancel = self.cancel.clone();
        self.subscription = Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    // Cancellation wins over a pending emission.
                    biased;
                    _ = cancel.cancelled() => {
                        tracing::debug!("profile subscription cancelled");
                        break;
                    }
                    changed = records.changed() => {
                        if changed.is_err() {
                            tracing::debug!("profile store dropped its feed");
                            break;
                        }
                        let record = records.borrow_and_update().clone();
                        match record.as_ref() {
                            Some(saved) if pending.take_echo(saved) => apply_echo(&draft, saved),
                            other => apply_emission(&draft, other),
                        }
                    }
                }
            }
        }));
    }

    /// Set `field` to `value` and re-validate it.
    ///
    /// Never fails: invalid input shows up as a field error on the draft.
    /// Ignored once the controller is closed.
    pub fn update_field(&self, field: ProfileField, value: impl Into<String>) {
        if self.is_closed() {
            tracing::warn!(field = %field, "ignoring edit on closed profile editor");
            return;
        }
        let value = value.into();
        self.draft.send_modify(|draft| draft.apply_field(field, value));
        tracing::trace!(field = %field, "profile field updated");
    }

    /// Validate the whole draft and, if valid, persist it.
    ///
    /// Inserts when no identity is known yet, updates otherwise. Returns only
    /// after the store has confirmed the write. On any error the draft is
    /// left exactly as it was so the caller can retry.
    ///
    /// The write runs on its own task: dropping this future mid-flight lets
    /// the write complete or fail on its own. If the controller is closed
    /// while the write is in flight, the outcome is still reported but the
    /// draft is left untouched.
    pub async fn save(&self) -> Result<SaveOutcome, EditError> {
        if self.is_closed() {
            return Err(EditError::Closed);
        }

        self.draft.send_modify(|draft| draft.revalidate());
        let draft = self.draft.borrow().clone();
        if !draft.is_valid() {
            tracing::debug!(failing = ?draft.errors.failing(), "profile not saved, draft invalid");
            return Ok(SaveOutcome::NotValid);
        }

        let profile = draft.to_profile();
        // Without a subscription no echo will ever be consumed.
        let tracked = self.subscription.is_some();
        if tracked {
            self.pending.push(profile.clone());
        }

        let store = Arc::clone(&self.store);
        let commit = profile.clone();
        let write = tokio::spawn(async move { store.upsert_singleton(&commit).await });

        let saved = match write.await {
            Ok(Ok(saved)) => saved,
            Ok(Err(e)) => {
                if tracked {
                    self.pending.forget(&profile);
                }
                tracing::warn!(error = %e, "profile save failed");
                return Err(EditError::Storage(e));
            }
            Err(e) => {
                if tracked {
                    self.pending.forget(&profile);
                }
                return Err(EditError::Interrupted(e.to_string()));
            }
        };

        let identity = saved.id;
        if self.is_closed() {
            tracing::debug!(id = ?identity, "profile saved after editor closed, draft untouched");
            return Ok(SaveOutcome::Saved(saved));
        }
        self.draft.send_if_modified(|draft| {
            let changed = draft.identity != identity;
            draft.identity = identity;
            changed
        });

        tracing::info!(
            id = ?identity,
            inserted = draft.identity.is_none(),
            "profile saved"
        );
        Ok(SaveOutcome::Saved(saved))
    }

    /// Copy of the current draft.
    pub fn snapshot(&self) -> DraftState {
        self.draft.borrow().clone()
    }

    /// Observe the draft. The receiver's first read is the current draft.
    pub fn watch(&self) -> watch::Receiver<DraftState> {
        self.draft.subscribe()
    }

    /// Stop following the store and refuse further edits.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

fn apply_emission(draft: &watch::Sender<DraftState>, record: Option<&Profile>) {
    draft.send_modify(|draft| draft.seed(record));
    tracing::debug!(id = ?record.and_then(|r| r.id), "profile draft seeded from store");
}

fn apply_echo(draft: &watch::Sender<DraftState>, saved: &Profile) {
    draft.send_if_modified(|draft| {
        let changed = draft.identity != saved.id;
        draft.identity = saved.id;
        changed
    });
    tracing::trace!(id = ?saved.id, "store echoed our own save");
}

/// Profiles this controller sent to the store whose echo has not been seen.
///
/// Oldest first. The store may coalesce emissions, so seeing the echo of one
/// commit also retires every commit queued before it.
#[derive(Debug, Default)]
struct PendingCommits {
    commits: Mutex<VecDeque<Profile>>,
}

impl PendingCommits {
    fn push(&self, commit: Profile) {
        self.lock().push_back(commit);
    }

    /// Drop a commit whose write failed.
    fn forget(&self, commit: &Profile) {
        let mut commits = self.lock();
        if let Some(pos) = commits.iter().position(|c| c == commit) {
            commits.remove(pos);
        }
    }

    /// Whether `record` is the echo of a pending commit. Retires it and
    /// everything older when it is.
    fn take_echo(&self, record: &Profile) -> bool {
        let mut commits = self.lock();
        match commits.iter().position(|c| is_echo_of(c, record)) {
            Some(pos) => {
                commits.drain(..=pos);
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Profile>> {
        self.commits.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An insert echoes back with a store-assigned id; an update keeps its id.
fn is_echo_of(commit: &Profile, record: &Profile) -> bool {
    (commit.id.is_none() || commit.id == record.id)
        && ProfileField::ALL
            .iter()
            .all(|f| commit.value(*f) == record.value(*f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
    use std::time::Duration;

    use tokio::sync::Notify;

    use persona_types::draft::FieldError;
    use persona_types::error::RepositoryError;
    use persona_types::profile::ProfileId;

    use crate::feed::ProfileFeed;

    // --- Mock store for testing ---

    /// In-memory store that records every write attempt.
    struct MockProfileStore {
        feed: ProfileFeed,
        writes: Mutex<Vec<Profile>>,
        fail_writes: AtomicBool,
        next_id: AtomicI64,
        /// When set, each write parks until the gate is notified.
        gate: Mutex<Option<Arc<Notify>>>,
        write_started: Notify,
    }

    impl MockProfileStore {
        fn empty() -> Self {
            Self::with(None)
        }

        fn holding(profile: Profile) -> Self {
            Self::with(Some(profile))
        }

        fn with(profile: Option<Profile>) -> Self {
            Self {
                feed: ProfileFeed::new(profile),
                writes: Mutex::new(Vec::new()),
                fail_writes: AtomicBool::new(false),
                next_id: AtomicI64::new(1),
                gate: Mutex::new(None),
                write_started: Notify::new(),
            }
        }

        /// Park every following write until the returned gate is notified.
        fn hold_writes(&self) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
            gate
        }

        fn writes(&self) -> Vec<Profile> {
            self.writes.lock().unwrap().clone()
        }

        fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }
    }

    impl ProfileStore for MockProfileStore {
        fn subscribe(&self) -> watch::Receiver<Option<Profile>> {
            self.feed.subscribe()
        }

        async fn get_singleton(&self) -> Result<Option<Profile>, RepositoryError> {
            Ok(self.feed.current())
        }

        async fn upsert_singleton(&self, profile: &Profile) -> Result<Profile, RepositoryError> {
            self.writes.lock().unwrap().push(profile.clone());
            self.write_started.notify_one();
            let gate = self.gate.lock().unwrap().clone();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(RepositoryError::Connection);
            }

            let saved = match profile.id {
                None => {
                    if self.feed.current().is_some() {
                        return Err(RepositoryError::Conflict("profile exists".to_string()));
                    }
                    let id = ProfileId(self.next_id.fetch_add(1, Ordering::SeqCst));
                    profile.clone().with_id(id)
                }
                Some(id) => match self.feed.current() {
                    Some(current) if current.id == Some(id) => profile.clone(),
                    _ => return Err(RepositoryError::NotFound),
                },
            };
            self.feed.publish(Some(saved.clone()));
            Ok(saved)
        }
    }

    fn bob() -> Profile {
        Profile::new("Bob", "Lee", "1 Main", "5551234567").with_id(ProfileId(7))
    }

    fn started(store: &Arc<MockProfileStore>) -> ProfileEditController<MockProfileStore> {
        let mut controller = ProfileEditController::new(Arc::clone(store));
        controller.initialize();
        controller
    }

    fn fill_anna(controller: &ProfileEditController<MockProfileStore>) {
        controller.update_field(ProfileField::FirstName, "Anna");
        controller.update_field(ProfileField::LastName, "Kim");
        controller.update_field(ProfileField::Address, "12 Elm St");
        controller.update_field(ProfileField::PhoneNumber, "+12345678901");
    }

    async fn wait_for_draft(
        controller: &ProfileEditController<MockProfileStore>,
        predicate: impl FnMut(&DraftState) -> bool,
    ) -> DraftState {
        let mut rx = controller.watch();
        let draft = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(predicate))
            .await
            .expect("draft did not reach expected state")
            .expect("draft channel closed")
            .clone();
        draft
    }

    // --- Tests ---

    #[tokio::test]
    async fn new_controller_starts_empty_and_invalid() {
        let store = Arc::new(MockProfileStore::holding(bob()));
        let controller = ProfileEditController::new(Arc::clone(&store));

        let draft = controller.snapshot();
        assert_eq!(draft, DraftState::default());
        assert!(!draft.is_valid());
    }

    #[tokio::test]
    async fn fresh_store_insert_flow() {
        let store = Arc::new(MockProfileStore::empty());
        let controller = started(&store);

        let draft = controller.snapshot();
        assert_eq!(draft.identity, None);
        assert_eq!(draft.first_name, "");
        assert!(!draft.is_valid());

        fill_anna(&controller);
        assert!(controller.snapshot().is_valid());

        let outcome = controller.save().await.unwrap();
        assert!(outcome.is_saved());

        let writes = store.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].id, None, "first save must be an insert");
        assert_eq!(writes[0].first_name, "Anna");
        assert_eq!(writes[0].phone_number, "+12345678901");
    }

    #[tokio::test]
    async fn existing_profile_seeds_valid_draft() {
        let store = Arc::new(MockProfileStore::holding(bob()));
        let controller = started(&store);

        let draft = controller.snapshot();
        assert_eq!(draft.identity, Some(ProfileId(7)));
        assert_eq!(draft.first_name, "Bob");
        assert_eq!(draft.last_name, "Lee");
        assert_eq!(draft.address, "1 Main");
        assert_eq!(draft.phone_number, "5551234567");
        assert!(draft.is_valid());
    }

    #[tokio::test]
    async fn invalid_phone_blocks_save_without_io() {
        let store = Arc::new(MockProfileStore::holding(bob()));
        let controller = started(&store);

        controller.update_field(ProfileField::PhoneNumber, "abc");
        let draft = controller.snapshot();
        assert_eq!(draft.error(ProfileField::PhoneNumber), Some(FieldError::InvalidFormat));
        assert!(!draft.is_valid());

        let outcome = controller.save().await.unwrap();
        assert_eq!(outcome, SaveOutcome::NotValid);
        assert!(store.writes().is_empty(), "store must not be called");
    }

    #[tokio::test]
    async fn blank_phone_reports_required() {
        let store = Arc::new(MockProfileStore::holding(bob()));
        let controller = started(&store);

        controller.update_field(ProfileField::PhoneNumber, "");
        assert_eq!(
            controller.snapshot().error(ProfileField::PhoneNumber),
            Some(FieldError::Required)
        );
    }

    #[tokio::test]
    async fn storage_failure_propagates_and_preserves_draft() {
        let store = Arc::new(MockProfileStore::empty());
        let controller = started(&store);
        fill_anna(&controller);
        store.fail_writes(true);

        let before = controller.snapshot();
        let err = controller.save().await.unwrap_err();
        assert!(matches!(err, EditError::Storage(RepositoryError::Connection)));
        assert_eq!(controller.snapshot(), before);

        // Retry succeeds once storage recovers.
        store.fail_writes(false);
        assert!(controller.save().await.unwrap().is_saved());
        assert_eq!(store.writes().len(), 2);
        assert_eq!(store.writes()[1].id, None);
    }

    #[tokio::test]
    async fn second_save_updates_instead_of_inserting() {
        let store = Arc::new(MockProfileStore::empty());
        let controller = started(&store);
        fill_anna(&controller);

        let first = controller.save().await.unwrap();
        let second = controller.save().await.unwrap();

        let writes = store.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].id, None);
        assert_eq!(writes[1].id, Some(ProfileId(1)));
        assert_eq!(first, second);
        assert_eq!(controller.snapshot().identity, Some(ProfileId(1)));
    }

    #[tokio::test]
    async fn save_uses_known_identity_for_update() {
        let store = Arc::new(MockProfileStore::holding(bob()));
        let controller = started(&store);

        controller.update_field(ProfileField::Address, "2 Side St");
        let outcome = controller.save().await.unwrap();

        let SaveOutcome::Saved(saved) = outcome else {
            panic!("expected save");
        };
        assert_eq!(saved.id, Some(ProfileId(7)));
        assert_eq!(saved.address, "2 Side St");
        assert_eq!(store.writes()[0].id, Some(ProfileId(7)));
    }

    #[tokio::test]
    async fn save_observes_latest_update() {
        let store = Arc::new(MockProfileStore::holding(bob()));
        let controller = started(&store);

        controller.update_field(ProfileField::FirstName, "Rob");
        controller.update_field(ProfileField::FirstName, "Robert");
        controller.save().await.unwrap();

        assert_eq!(store.writes()[0].first_name, "Robert");
    }

    #[tokio::test]
    async fn save_revalidates_every_field() {
        let store = Arc::new(MockProfileStore::empty());
        let controller = ProfileEditController::new(Arc::clone(&store));
        // Not initialized: errors are unset, values blank.
        assert!(controller.snapshot().errors.is_clear());

        let outcome = controller.save().await.unwrap();
        assert_eq!(outcome, SaveOutcome::NotValid);
        let draft = controller.snapshot();
        for field in ProfileField::ALL {
            assert_eq!(draft.error(field), Some(FieldError::Required));
        }
    }

    #[tokio::test]
    async fn later_emission_reseeds_draft() {
        let store = Arc::new(MockProfileStore::holding(bob()));
        let controller = started(&store);
        controller.update_field(ProfileField::FirstName, "Unsaved");

        let external = Profile::new("Carol", "Lee", "1 Main", "5551234567").with_id(ProfileId(7));
        store.feed.publish(Some(external));

        let draft = wait_for_draft(&controller, |d| d.first_name == "Carol").await;
        assert_eq!(draft.identity, Some(ProfileId(7)));
        assert!(draft.is_valid());
    }

    #[tokio::test]
    async fn emission_of_none_clears_identity() {
        let store = Arc::new(MockProfileStore::holding(bob()));
        let controller = started(&store);

        store.feed.publish(None);

        let draft = wait_for_draft(&controller, |d| d.identity.is_none()).await;
        assert_eq!(draft.first_name, "");
        assert!(!draft.is_valid());
    }

    #[tokio::test]
    async fn initialize_twice_is_noop() {
        let store = Arc::new(MockProfileStore::holding(bob()));
        let mut controller = started(&store);
        let subscribers = store.feed.subscriber_count();

        controller.initialize();

        assert_eq!(store.feed.subscriber_count(), subscribers);
    }

    #[tokio::test]
    async fn closed_controller_rejects_edits_and_saves() {
        let store = Arc::new(MockProfileStore::holding(bob()));
        let controller = started(&store);

        controller.close();
        assert!(controller.is_closed());

        controller.update_field(ProfileField::FirstName, "Ignored");
        assert_eq!(controller.snapshot().first_name, "Bob");

        let err = controller.save().await.unwrap_err();
        assert!(matches!(err, EditError::Closed));
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn drop_releases_subscription() {
        let store = Arc::new(MockProfileStore::holding(bob()));
        let controller = started(&store);
        assert_eq!(store.feed.subscriber_count(), 1);

        drop(controller);

        tokio::time::timeout(Duration::from_secs(2), async {
            while store.feed.subscriber_count() > 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("subscription task should exit after drop");
    }

    #[tokio::test]
    async fn watchers_see_field_updates() {
        let store = Arc::new(MockProfileStore::empty());
        let controller = started(&store);
        let mut rx = controller.watch();

        controller.update_field(ProfileField::LastName, "Kim");

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().last_name, "Kim");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn edits_after_save_survive_the_store_echo() {
        let store = Arc::new(MockProfileStore::empty());
        let controller = started(&store);
        fill_anna(&controller);

        for i in 0..200 {
            controller.update_field(ProfileField::FirstName, format!("Saved{i}"));
            assert!(controller.save().await.unwrap().is_saved());
            controller.update_field(ProfileField::FirstName, "AfterSave");
            tokio::time::sleep(Duration::from_millis(1)).await;

            let draft = controller.snapshot();
            assert_eq!(draft.first_name, "AfterSave", "iteration {i} lost the edit");
            assert_eq!(draft.identity, Some(ProfileId(1)));
        }
        assert_eq!(store.writes().len(), 200);
    }

    #[tokio::test]
    async fn late_echo_of_earlier_save_keeps_newer_edits() {
        let store = Arc::new(MockProfileStore::holding(bob()));
        let controller = started(&store);

        controller.update_field(ProfileField::FirstName, "First");
        controller.save().await.unwrap();
        controller.update_field(ProfileField::FirstName, "Second");
        controller.save().await.unwrap();
        controller.update_field(ProfileField::Address, "9 New Rd");

        tokio::time::sleep(Duration::from_millis(20)).await;
        let draft = controller.snapshot();
        assert_eq!(draft.first_name, "Second");
        assert_eq!(draft.address, "9 New Rd");
    }

    #[tokio::test]
    async fn external_write_still_reseeds_after_own_save() {
        let store = Arc::new(MockProfileStore::holding(bob()));
        let controller = started(&store);
        controller.update_field(ProfileField::FirstName, "Mine");
        controller.save().await.unwrap();

        let external = Profile::new("Theirs", "Lee", "1 Main", "5551234567").with_id(ProfileId(7));
        store.feed.publish(Some(external));

        let draft = wait_for_draft(&controller, |d| d.first_name == "Theirs").await;
        assert_eq!(draft.identity, Some(ProfileId(7)));
    }

    #[tokio::test]
    async fn dropped_save_lets_write_finish_and_keeps_draft_consistent() {
        let store = Arc::new(MockProfileStore::empty());
        let controller = started(&store);
        fill_anna(&controller);
        let gate = store.hold_writes();

        let abandoned = tokio::time::timeout(Duration::from_millis(50), controller.save()).await;
        assert!(abandoned.is_err(), "save should still be waiting on the store");
        assert_eq!(store.writes().len(), 1);
        assert!(store.feed.current().is_none());

        gate.notify_one();

        let draft = wait_for_draft(&controller, |d| d.identity.is_some()).await;
        assert_eq!(draft.identity, Some(ProfileId(1)));
        assert_eq!(draft.first_name, "Anna");
        assert!(draft.is_valid());
        assert_eq!(
            store.feed.current().map(|p| p.first_name),
            Some("Anna".to_string())
        );
    }

    #[tokio::test]
    async fn close_during_save_completes_write_without_touching_draft() {
        let store = Arc::new(MockProfileStore::empty());
        let controller = Arc::new(started(&store));
        fill_anna(&controller);
        let gate = store.hold_writes();

        let saving = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.save().await })
        };
        store.write_started.notified().await;

        controller.close();
        let before = controller.snapshot();
        gate.notify_one();

        let outcome = saving.await.unwrap().unwrap();
        let SaveOutcome::Saved(saved) = outcome else {
            panic!("write should complete");
        };
        assert_eq!(saved.id, Some(ProfileId(1)));
        assert_eq!(store.feed.current(), Some(saved));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(controller.snapshot(), before);
        assert_eq!(controller.snapshot().identity, None);
    }

    #[tokio::test]
    async fn failed_save_is_not_mistaken_for_an_echo() {
        let store = Arc::new(MockProfileStore::holding(bob()));
        let controller = started(&store);
        controller.update_field(ProfileField::FirstName, "Carol");
        store.fail_writes(true);
        assert!(controller.save().await.is_err());

        // Someone else now stores exactly what we tried to write.
        let external = Profile::new("Carol", "Lee", "1 Main", "5551234567").with_id(ProfileId(7));
        controller.update_field(ProfileField::FirstName, "Dave");
        store.feed.publish(Some(external));

        let draft = wait_for_draft(&controller, |d| d.first_name == "Carol").await;
        assert_eq!(draft.identity, Some(ProfileId(7)));
    }

    #[test]
    fn pending_commits_retire_older_entries_on_echo() {
        let pending = PendingCommits::default();
        let first = Profile::new("A", "B", "C", "5551234567");
        let second = Profile::new("A2", "B", "C", "5551234567");
        pending.push(first.clone());
        pending.push(second.clone());

        assert!(pending.take_echo(&second.clone().with_id(ProfileId(3))));
        assert!(!pending.take_echo(&first.with_id(ProfileId(3))));
    }

    #[test]
    fn echo_requires_matching_identity_for_updates() {
        let commit = bob();
        let other_row = bob().with_id(ProfileId(8));
        assert!(is_echo_of(&commit, &bob()));
        assert!(!is_echo_of(&commit, &other_row));

        let mut changed = bob();
        changed.address = "2 Side St".to_string();
        assert!(!is_echo_of(&commit, &changed));
    }
}
