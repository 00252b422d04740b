//! Replay-latest subject for the stored profile.
//!
//! Built on `tokio::sync::watch`, which needs no running runtime: a
//! `ProfileFeed` always holds the latest value, new subscribers read it
//! immediately, and every `publish` wakes all subscribers. Stores use one
//! feed each to implement `ProfileStore::subscribe`.

use persona_types::profile::Profile;
use tokio::sync::watch;

/// Observable holder of the current profile (`None` = no profile yet).
///
/// Cloning the feed clones the sender, so every clone publishes into and
/// subscribes from the same channel.
#[derive(Clone)]
pub struct ProfileFeed {
    sender: watch::Sender<Option<Profile>>,
}

impl ProfileFeed {
    /// Create a feed seeded with the current stored value.
    pub fn new(initial: Option<Profile>) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Create a new subscriber. Its first `borrow()` yields the current value;
    /// `changed()` resolves on the next publish.
    pub fn subscribe(&self) -> watch::Receiver<Option<Profile>> {
        self.sender.subscribe()
    }

    /// Replace the current value and notify every subscriber.
    ///
    /// Always notifies, even when the value is unchanged, so each persisted
    /// write produces one emission. Publishing with no subscribers keeps the
    /// value for the next one.
    pub fn publish(&self, profile: Option<Profile>) {
        self.sender.send_replace(profile);
    }

    /// Clone of the current value.
    pub fn current(&self) -> Option<Profile> {
        self.sender.borrow().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ProfileFeed {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for ProfileFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileFeed")
            .field("subscriber_count", &self.sender.receiver_count())
            .finish()
    }
}
