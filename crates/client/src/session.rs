//! Durable authentication state.
//!
//! The [`SessionStore`] is the single source of truth for "who is logged
//! in". It owns the in-memory [`SessionState`] and the durable
//! [`SessionStorage`](crate::storage::SessionStorage) behind it, and
//! publishes every transition on a watch channel so dependents (the cart
//! manager, the embedding UI) observe changes before their next read.
//!
//! The state is an enum, not a pair of optionals: a token without a
//! resolved identity (or the reverse) is unrepresentable. Persisted state
//! that violates this on restore is treated as corrupt and cleared.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;
use tracing::{debug, warn};

use vitrine_core::AccessToken;

use crate::api::types::UserIdentity;
use crate::storage::{SessionStorage, StorageError, StoredSession};

/// Authentication state: either fully anonymous or fully authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No credential, no identity.
    Anonymous,
    /// Credential and resolved identity, both present.
    Authenticated {
        /// Bearer token attached to authenticated requests.
        token: AccessToken,
        /// Identity of the logged-in user.
        user: UserIdentity,
    },
}

impl SessionState {
    /// True if a user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// A session transition, published to dependents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session became authenticated (fresh login or restore).
    LoggedIn(UserIdentity),
    /// The session was ended by the user.
    LoggedOut,
    /// The session was torn down because the backend rejected the
    /// credential; the embedding UI should navigate to its login entry
    /// point.
    Expired,
}

/// Shared, durable session store.
///
/// Cheaply cloneable; all clones share the same state, storage, and event
/// channel.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    state: RwLock<SessionState>,
    storage: Box<dyn SessionStorage>,
    events: watch::Sender<SessionEvent>,
}

impl SessionStore {
    /// Create a new store over the given durable storage.
    ///
    /// The store starts anonymous; call [`restore`](Self::restore) before
    /// constructing dependents.
    #[must_use]
    pub fn new(storage: Box<dyn SessionStorage>) -> Self {
        let (events, _) = watch::channel(SessionEvent::LoggedOut);
        Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(SessionState::Anonymous),
                storage,
                events,
            }),
        }
    }

    /// Restore the persisted session, if any.
    ///
    /// Both keys present: the session becomes authenticated. Neither:
    /// it stays anonymous. One without the other, or an unparseable
    /// identity: the persisted state is corrupt, both keys are cleared,
    /// and the session stays anonymous.
    ///
    /// # Errors
    ///
    /// Returns an error if durable storage cannot be read.
    pub fn restore(&self) -> Result<(), StorageError> {
        let stored = self.inner.storage.load()?;

        match (stored.token, stored.user) {
            (Some(token), Some(user_json)) => match serde_json::from_str::<UserIdentity>(&user_json)
            {
                Ok(user) => {
                    debug!(username = %user.username, "restored persisted session");
                    self.set_state(SessionState::Authenticated {
                        token: AccessToken::new(token),
                        user: user.clone(),
                    });
                    self.inner.events.send_replace(SessionEvent::LoggedIn(user));
                }
                Err(e) => {
                    warn!("persisted identity is unreadable, clearing session: {e}");
                    self.clear_storage();
                }
            },
            (None, None) => {}
            _ => {
                warn!("persisted session is missing one of its two keys, clearing");
                self.clear_storage();
            }
        }

        Ok(())
    }

    /// Establish an authenticated session, persisting both pieces.
    ///
    /// The in-memory state changes only after persistence succeeds, so a
    /// failed login attempt is never observable as a state change.
    ///
    /// # Errors
    ///
    /// Returns an error if durable storage cannot be written.
    pub fn establish(&self, token: AccessToken, user: UserIdentity) -> Result<(), StorageError> {
        let stored = StoredSession {
            token: Some(token.as_str().to_string()),
            user: Some(serde_json::to_string(&user)?),
        };
        self.inner.storage.store(&stored)?;

        self.set_state(SessionState::Authenticated {
            token,
            user: user.clone(),
        });
        self.inner.events.send_replace(SessionEvent::LoggedIn(user));
        Ok(())
    }

    /// End the session: clear in-memory state and durable storage.
    ///
    /// Never fails; a storage error while clearing is logged and the
    /// in-memory state is cleared regardless.
    pub fn clear(&self) {
        self.set_state(SessionState::Anonymous);
        self.clear_storage();
        self.inner.events.send_replace(SessionEvent::LoggedOut);
    }

    /// Tear the session down because the backend rejected the credential.
    ///
    /// Same effect as [`clear`](Self::clear) but publishes
    /// [`SessionEvent::Expired`]. Idempotent: concurrent in-flight
    /// requests that each receive a 401 may all call this.
    pub fn force_teardown(&self) {
        self.set_state(SessionState::Anonymous);
        self.clear_storage();
        self.inner.events.send_replace(SessionEvent::Expired);
    }

    /// Current bearer token, if authenticated.
    #[must_use]
    pub fn token(&self) -> Option<AccessToken> {
        match &*self.read_state() {
            SessionState::Authenticated { token, .. } => Some(token.clone()),
            SessionState::Anonymous => None,
        }
    }

    /// Identity of the logged-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserIdentity> {
        match &*self.read_state() {
            SessionState::Authenticated { user, .. } => Some(user.clone()),
            SessionState::Anonymous => None,
        }
    }

    /// True if a user is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read_state().is_authenticated()
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.read_state().clone()
    }

    /// Subscribe to session transitions.
    ///
    /// The receiver's current value reflects the latest transition, so a
    /// subscriber created after a restore still sees the restored state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: SessionState) {
        *self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner) = next;
    }

    fn clear_storage(&self) {
        if let Err(e) = self.inner.storage.clear() {
            warn!("failed to clear durable session storage: {e}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    use vitrine_core::UserId;

    fn identity(username: &str) -> UserIdentity {
        UserIdentity {
            id: UserId::new(1),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            full_name: String::new(),
            is_active: true,
        }
    }

    fn store_with(stored: StoredSession) -> SessionStore {
        let storage = MemoryStorage::new();
        storage.store(&stored).unwrap();
        SessionStore::new(Box::new(storage))
    }

    #[test]
    fn test_user_present_iff_token_present() {
        let store = SessionStore::new(Box::new(MemoryStorage::new()));

        // Anonymous: neither
        assert!(store.token().is_none());
        assert!(store.current_user().is_none());

        // Authenticated: both
        store
            .establish(AccessToken::new("tok".to_string()), identity("alice"))
            .unwrap();
        assert!(store.token().is_some());
        assert!(store.current_user().is_some());

        // Cleared: neither again
        store.clear();
        assert!(store.token().is_none());
        assert!(store.current_user().is_none());
    }

    #[test]
    fn test_restore_round_trip() {
        let storage = MemoryStorage::new();
        let first = SessionStore::new(Box::new(storage));
        first
            .establish(AccessToken::new("tok".to_string()), identity("alice"))
            .unwrap();

        // A fresh store over the same persisted bytes reproduces the state
        let persisted = first.inner.storage.load().unwrap();
        let second = store_with(persisted);
        second.restore().unwrap();

        assert_eq!(second.state(), first.state());
    }

    #[test]
    fn test_restore_empty_storage_stays_anonymous() {
        let store = SessionStore::new(Box::new(MemoryStorage::new()));
        store.restore().unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_restore_token_without_identity_clears_both() {
        let store = store_with(StoredSession {
            token: Some("tok".to_string()),
            user: None,
        });
        store.restore().unwrap();

        assert!(!store.is_authenticated());
        assert!(store.inner.storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_restore_unparseable_identity_clears_both() {
        let store = store_with(StoredSession {
            token: Some("tok".to_string()),
            user: Some("{not json".to_string()),
        });
        store.restore().unwrap();

        assert!(!store.is_authenticated());
        assert!(store.inner.storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_force_teardown_publishes_expired() {
        let store = SessionStore::new(Box::new(MemoryStorage::new()));
        store
            .establish(AccessToken::new("tok".to_string()), identity("alice"))
            .unwrap();
        let rx = store.subscribe();

        store.force_teardown();

        assert!(!store.is_authenticated());
        assert!(store.inner.storage.load().unwrap().is_empty());
        assert_eq!(*rx.borrow(), SessionEvent::Expired);

        // Redundant teardown is idempotent
        store.force_teardown();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_logout_never_fails_on_empty_state() {
        let store = SessionStore::new(Box::new(MemoryStorage::new()));
        store.clear();
        store.clear();
        assert!(!store.is_authenticated());
    }
}
