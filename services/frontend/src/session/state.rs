//! services/frontend/src/session/state.rs
//!
//! The published "who is signed in" state and its single writer.

use booking_auth_core::domain::Profile;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// A point-in-time view of the session.
///
/// `is_authenticated()` is derived from `current_user()`, so the two can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    current_user: Option<Profile>,
}

impl SessionSnapshot {
    pub fn signed_in(profile: Profile) -> Self {
        Self {
            current_user: Some(profile),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<&Profile> {
        self.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }
}

/// Owns the watch channel behind `SessionService` and orders writes to it.
///
/// Every write happens under the channel's lock. Writes triggered by an auth-state
/// event carry the generation they were started under and are dropped if anything
/// was published since.
pub(crate) struct SessionPublisher {
    sender: watch::Sender<SessionSnapshot>,
    generation: AtomicU64,
}

impl SessionPublisher {
    pub(crate) fn new() -> Self {
        let (sender, _) = watch::channel(SessionSnapshot::signed_out());
        Self {
            sender,
            generation: AtomicU64::new(0),
        }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.sender.subscribe()
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        self.sender.borrow().clone()
    }

    /// Starts a new generation, invalidating every write tagged with an older one.
    pub(crate) fn advance(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publishes unconditionally and invalidates in-flight tagged writes.
    pub(crate) fn publish(&self, snapshot: SessionSnapshot) {
        self.sender.send_modify(|current| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *current = snapshot;
        });
    }

    /// Like `publish`, but only if `condition` holds when checked under the channel's lock.
    /// Returns whether it published.
    pub(crate) fn publish_when<F>(&self, snapshot: SessionSnapshot, condition: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        self.sender.send_if_modified(|current| {
            if !condition() {
                return false;
            }
            self.generation.fetch_add(1, Ordering::SeqCst);
            *current = snapshot;
            true
        })
    }

    /// Publishes only if `generation` is still the latest. Returns whether it did.
    pub(crate) fn publish_if_current(&self, generation: u64, snapshot: SessionSnapshot) -> bool {
        self.sender.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *current = snapshot;
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn alice() -> Profile {
        Profile {
            uid: "u1".to_string(),
            email: "a@x.com".to_string(),
            name: "Alice".to_string(),
            photo_url: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn snapshot_flags_follow_user() {
        let signed_out = SessionSnapshot::signed_out();
        assert!(!signed_out.is_authenticated());
        assert!(signed_out.current_user().is_none());

        let signed_in = SessionSnapshot::signed_in(alice());
        assert!(signed_in.is_authenticated());
        assert_eq!(signed_in.current_user().map(|p| p.name.as_str()), Some("Alice"));
    }

    #[test]
    fn stale_generation_is_dropped() {
        let publisher = SessionPublisher::new();
        let stale = publisher.advance();
        let fresh = publisher.advance();

        assert!(!publisher.publish_if_current(stale, SessionSnapshot::signed_in(alice())));
        assert!(!publisher.snapshot().is_authenticated());

        assert!(publisher.publish_if_current(fresh, SessionSnapshot::signed_in(alice())));
        assert!(publisher.snapshot().is_authenticated());
    }

    #[test]
    fn direct_publish_invalidates_pending_writes() {
        let publisher = SessionPublisher::new();
        let mut receiver = publisher.subscribe();
        let pending = publisher.advance();

        publisher.publish(SessionSnapshot::signed_out());
        assert!(receiver.has_changed().unwrap());
        let _ = receiver.borrow_and_update();

        assert!(!publisher.publish_if_current(pending, SessionSnapshot::signed_in(alice())));
        assert!(!receiver.has_changed().unwrap());
        assert!(!publisher.snapshot().is_authenticated());
    }

    #[test]
    fn conditional_publish() {
        let publisher = SessionPublisher::new();
        let mut receiver = publisher.subscribe();
        let pending = publisher.advance();

        assert!(!publisher.publish_when(SessionSnapshot::signed_in(alice()), || false));
        assert!(!receiver.has_changed().unwrap());
        assert!(!publisher.snapshot().is_authenticated());

        assert!(publisher.publish_when(SessionSnapshot::signed_in(alice()), || true));
        assert!(receiver.has_changed().unwrap());
        assert!(publisher.snapshot().is_authenticated());

        assert!(!publisher.publish_if_current(pending, SessionSnapshot::signed_out()));
        assert!(publisher.snapshot().is_authenticated());
    }
}
