//! Session Store
//!
//! The client-side authentication state machine. It owns the current identity
//! and keeps it in lockstep with the record in client storage: every
//! successful transition into `Authenticated` writes the record, sign-out
//! deletes it, and a failed operation leaves both exactly as they were.
//!
//! ```text
//!   startup ──> Restoring ──┬──> Authenticated ──sign_out──> Unauthenticated
//!                           └──> Unauthenticated
//!   Unauthenticated ──sign_in/sign_up──> Authenticating ──ok──> Authenticated
//!                                                       └─err─> Unauthenticated
//! ```

use tracing::{debug, info, warn};

use super::{
    events::{SessionEvent, SessionEventKind, SessionListener, Subscribers, SubscriptionId},
    Session, SessionState,
};
use crate::{
    config::SessionConfig,
    identity::{create_test_storage, ClientStorage, Identity, IdentityDirectory, MemoryDirectory, MemoryStorage},
    latency::{Latency, NoLatency},
    types::IdentityId,
    Result, XrayError,
};

/// Session store over injected directory, storage and latency ports
pub struct SessionStore<D, S, L> {
    /// Known identities (stand-in for a user backend)
    directory: D,

    /// Durable client storage holding the current identity
    storage: S,

    /// Simulated round-trip delay
    latency: L,

    config: SessionConfig,

    state: SessionState,

    /// Current identity; present iff `state` is `Authenticated`, or
    /// `Authenticating` from an already authenticated session
    identity: Option<Identity>,

    subscribers: Subscribers,
}

/// Store wired entirely to in-memory adapters
pub type MemorySessionStore = SessionStore<MemoryDirectory, MemoryStorage, NoLatency>;

impl MemorySessionStore {
    /// Create a restored store with a seeded directory and no latency
    pub fn new_for_testing() -> Self {
        let config = SessionConfig::instant();
        let mut store = Self::new(
            MemoryDirectory::from_config(&config),
            create_test_storage(),
            NoLatency,
            config,
        );
        store.restore();
        store
    }
}

impl<D, S, L> SessionStore<D, S, L>
where
    D: IdentityDirectory,
    S: ClientStorage,
    L: Latency,
{
    /// Create a store in the `Restoring` state; call [`restore`](Self::restore)
    /// once listeners are attached
    pub fn new(directory: D, storage: S, latency: L, config: SessionConfig) -> Self {
        Self {
            directory,
            storage,
            latency,
            config,
            state: SessionState::Restoring,
            identity: None,
            subscribers: Subscribers::new(),
        }
    }

    /// Create a store and restore it from storage immediately
    pub fn open(directory: D, storage: S, latency: L, config: SessionConfig) -> Self {
        let mut store = Self::new(directory, storage, latency, config);
        store.restore();
        store
    }

    // ----------------------------------------------------------------------------
    // Transitions
    // ----------------------------------------------------------------------------

    /// Restore the session from client storage
    ///
    /// Synchronous and total: an unreadable backend or a corrupt record
    /// yields `Unauthenticated`. A corrupt record is deleted so storage and
    /// memory agree afterwards.
    pub fn restore(&mut self) -> Session {
        self.state = SessionState::Restoring;
        self.identity = None;

        match self.storage.retrieve(&self.config.storage_key) {
            Ok(Some(record)) => match serde_json::from_str::<Identity>(&record) {
                Ok(identity) => {
                    info!(id = %identity.id, email = %identity.email, "Restored stored session");
                    self.identity = Some(identity);
                }
                Err(e) => {
                    warn!("Discarding unreadable session record: {}", e);
                    if let Err(e) = self.storage.delete(&self.config.storage_key) {
                        warn!("Failed to delete unreadable session record: {}", e);
                    }
                }
            },
            Ok(None) => debug!("No stored session"),
            Err(e) => warn!("Client storage unreadable during restore: {}", e),
        }

        self.state = if self.identity.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        };
        self.emit(SessionEventKind::Restored);
        self.session()
    }

    /// Sign in with an email and password
    ///
    /// The password is accepted unconditionally; the directory holds no
    /// secrets. Unknown emails are registered on the fly unless
    /// `auto_register_unknown` is off, in which case they fail with
    /// `InvalidCredentials`.
    pub async fn sign_in(&mut self, email: &str, _password: &str) -> Result<Identity> {
        debug!(%email, "Sign-in requested");

        let previous = self.begin_authentication();
        self.latency.pause(self.config.auth_latency()).await;

        let outcome = match self.directory.find_by_email(email) {
            Some(identity) => self.persist(&identity).map(|()| identity),
            None if self.config.auto_register_unknown => {
                let identity = Identity::new(IdentityId::sequential(self.directory.len()), email);
                info!(id = %identity.id, %email, "Registering unknown email on sign-in");
                self.register(identity)
            }
            None => Err(XrayError::invalid_credentials()),
        };

        self.finish_authentication(outcome, previous, SessionEventKind::SignedIn)
    }

    /// Create an account and sign in as it
    ///
    /// Fails with `DuplicateIdentity` when the email is already known, without
    /// touching the directory.
    pub async fn sign_up(
        &mut self,
        name: &str,
        email: &str,
        _password: &str,
        organization: &str,
    ) -> Result<Identity> {
        debug!(%email, %organization, "Sign-up requested");

        let previous = self.begin_authentication();
        self.latency.pause(self.config.auth_latency()).await;

        let outcome = if self.directory.find_by_email(email).is_some() {
            Err(XrayError::duplicate_identity(email))
        } else {
            let identity = Identity::new(IdentityId::sequential(self.directory.len()), email)
                .with_display_name(name);
            self.register(identity)
        };

        self.finish_authentication(outcome, previous, SessionEventKind::SignedUp)
    }

    /// Sign out, removing the identity from memory and storage
    ///
    /// If storage refuses the delete the session stays authenticated, so the
    /// two never disagree.
    pub fn sign_out(&mut self) -> Result<()> {
        self.storage.delete(&self.config.storage_key)?;

        if let Some(identity) = self.identity.take() {
            info!(id = %identity.id, "Signed out");
        }
        self.state = SessionState::Unauthenticated;
        self.emit(SessionEventKind::SignedOut);
        Ok(())
    }

    // ----------------------------------------------------------------------------
    // Observers
    // ----------------------------------------------------------------------------

    /// Register a listener for session changes
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&SessionEvent) + 'static,
    {
        let listener: SessionListener = Box::new(listener);
        self.subscribers.subscribe(listener)
    }

    /// Remove a listener, returning whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    // ----------------------------------------------------------------------------
    // Accessors
    // ----------------------------------------------------------------------------

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        Session::snapshot(self.state, self.identity.as_ref())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ----------------------------------------------------------------------------
    // Private Methods
    // ----------------------------------------------------------------------------

    /// Enter `Authenticating`, remembering the state to fall back to
    fn begin_authentication(&mut self) -> SessionState {
        let previous = self.state;
        self.state = SessionState::Authenticating;
        self.emit(SessionEventKind::AuthenticationStarted);
        previous
    }

    fn finish_authentication(
        &mut self,
        outcome: Result<Identity>,
        previous: SessionState,
        success: SessionEventKind,
    ) -> Result<Identity> {
        match outcome {
            Ok(identity) => {
                info!(id = %identity.id, email = %identity.email, "Authenticated");
                self.identity = Some(identity.clone());
                self.state = SessionState::Authenticated;
                self.emit(success);
                Ok(identity)
            }
            Err(e) => {
                warn!("Authentication failed: {}", e);
                // Identity and storage were not touched, so the prior state
                // still describes them
                self.state = if previous == SessionState::Authenticated && self.identity.is_some() {
                    SessionState::Authenticated
                } else {
                    SessionState::Unauthenticated
                };
                self.emit(SessionEventKind::AuthenticationFailed);
                Err(e)
            }
        }
    }

    /// Persist first, then insert, so a storage failure leaves the directory
    /// unchanged
    fn register(&mut self, identity: Identity) -> Result<Identity> {
        self.persist(&identity)?;
        if let Err(e) = self.directory.insert(identity.clone()) {
            self.restore_previous_record();
            return Err(e);
        }
        Ok(identity)
    }

    fn persist(&mut self, identity: &Identity) -> Result<()> {
        let record = serde_json::to_string(identity)?;
        self.storage.store(&self.config.storage_key, record)
    }

    /// Put storage back in line with the in-memory identity after a failed
    /// registration
    fn restore_previous_record(&mut self) {
        let result = match &self.identity {
            Some(current) => serde_json::to_string(current)
                .map_err(XrayError::from)
                .and_then(|record| self.storage.store(&self.config.storage_key, record)),
            None => self.storage.delete(&self.config.storage_key),
        };
        if let Err(e) = result {
            warn!("Failed to roll back session record: {}", e);
        }
    }

    fn emit(&mut self, kind: SessionEventKind) {
        let event = SessionEvent {
            kind,
            session: self.session(),
        };
        self.subscribers.emit(&event);
    }
}

impl<D, S, L> core::fmt::Debug for SessionStore<D, S, L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state)
            .field("identity", &self.identity)
            .field("subscribers", &self.subscribers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AuthError;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn stored_identity(store: &MemorySessionStore) -> Option<Identity> {
        store
            .storage()
            .retrieve("user")
            .unwrap()
            .map(|record| serde_json::from_str(&record).unwrap())
    }

    /// Store with real timers and the default one-second round trip, plus a
    /// log of `(kind, loading, time)` for every event
    #[cfg(feature = "std")]
    fn timed_store() -> (
        SessionStore<MemoryDirectory, MemoryStorage, crate::latency::TokioLatency>,
        Rc<RefCell<Vec<(SessionEventKind, bool, tokio::time::Instant)>>>,
    ) {
        let config = SessionConfig::default();
        let mut store = SessionStore::open(
            MemoryDirectory::from_config(&config),
            MemoryStorage::new(),
            crate::latency::TokioLatency,
            config,
        );
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        store.subscribe(move |event| {
            sink.borrow_mut()
                .push((event.kind, event.session.loading, tokio::time::Instant::now()))
        });
        (store, log)
    }

    #[cfg(feature = "std")]
    #[tokio::test(start_paused = true)]
    async fn test_sign_in_waits_out_round_trip() {
        let (mut store, log) = timed_store();
        let round_trip = SessionConfig::default().auth_latency();
        assert!(round_trip >= std::time::Duration::from_millis(1000));

        let start = tokio::time::Instant::now();
        store.sign_in("demo@example.com", "pw").await.unwrap();
        assert!(start.elapsed() >= round_trip);

        let log = log.borrow();
        let (started, loading, started_at) = log[0];
        assert!(matches!(started, SessionEventKind::AuthenticationStarted));
        assert!(loading);
        assert_eq!(started_at, start);

        let (finished, loading, finished_at) = log[1];
        assert!(matches!(finished, SessionEventKind::SignedIn));
        assert!(!loading);
        assert!(finished_at - started_at >= round_trip);
    }

    #[cfg(feature = "std")]
    #[tokio::test(start_paused = true)]
    async fn test_sign_up_waits_out_round_trip() {
        let (mut store, log) = timed_store();
        let round_trip = SessionConfig::default().auth_latency();

        let start = tokio::time::Instant::now();
        store.sign_up("Ann Lee", "ann@acme.io", "pw", "Acme").await.unwrap();
        assert!(start.elapsed() >= round_trip);

        let log = log.borrow();
        assert!(matches!(log[0].0, SessionEventKind::AuthenticationStarted));
        assert!(log[0].1);
        assert!(matches!(log[1].0, SessionEventKind::SignedUp));
        assert!(!log[1].1);
        assert!(log[1].2 - log[0].2 >= round_trip);
    }

    #[cfg(feature = "std")]
    #[tokio::test(start_paused = true)]
    async fn test_rejected_sign_up_still_waits() {
        let (mut store, log) = timed_store();
        let round_trip = SessionConfig::default().auth_latency();

        let start = tokio::time::Instant::now();
        assert!(store.sign_up("Dup", "demo@example.com", "pw", "Acme").await.is_err());
        assert!(start.elapsed() >= round_trip);
        assert!(log.borrow()[0].1);
        assert!(!store.session().loading);
    }

    #[tokio::test]
    async fn test_demo_sign_in_and_out() {
        let mut store = MemorySessionStore::new_for_testing();
        assert_eq!(store.state(), SessionState::Unauthenticated);

        let identity = store.sign_in("demo@example.com", "x").await.unwrap();
        assert_eq!(identity, Identity::demo());
        assert_eq!(store.state(), SessionState::Authenticated);
        assert_eq!(stored_identity(&store), Some(Identity::demo()));

        store.sign_out().unwrap();
        assert_eq!(store.state(), SessionState::Unauthenticated);
        assert!(store.identity().is_none());
        assert!(store.storage().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_sign_up() {
        let mut store = MemorySessionStore::new_for_testing();

        let err = store
            .sign_up("Ann", "demo@example.com", "pw", "Acme")
            .await
            .unwrap_err();

        assert_eq!(
            err.as_auth(),
            Some(&AuthError::DuplicateIdentity {
                email: "demo@example.com".to_string()
            })
        );
        assert_eq!(store.state(), SessionState::Unauthenticated);
        assert_eq!(store.directory().len(), 1);
        assert!(store.storage().is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_on_empty_directory() {
        let mut store = SessionStore::open(
            MemoryDirectory::new(),
            MemoryStorage::new(),
            NoLatency,
            SessionConfig::instant(),
        );

        let identity = store.sign_in("new@x.com", "pw").await.unwrap();
        assert_eq!(identity.id.as_str(), "1");
        assert_eq!(identity.email, "new@x.com");
        assert_eq!(identity.display_name, None);
        assert_eq!(store.state(), SessionState::Authenticated);
        assert_eq!(store.directory().find_by_email("new@x.com"), Some(identity));
    }

    #[tokio::test]
    async fn test_sign_up_creates_named_identity() {
        let mut store = MemorySessionStore::new_for_testing();

        let identity = store
            .sign_up("Ann Lee", "ann@acme.io", "pw", "Acme")
            .await
            .unwrap();

        assert_eq!(identity.id.as_str(), "2");
        assert_eq!(identity.display_name.as_deref(), Some("Ann Lee"));
        assert_eq!(stored_identity(&store), Some(identity.clone()));

        // A second sign-up with the same email is now a duplicate
        store.sign_out().unwrap();
        let err = store.sign_up("Ann", "ann@acme.io", "pw", "Acme").await.unwrap_err();
        assert!(err.is_duplicate_identity());
        assert_eq!(store.directory().len(), 2);
    }

    #[tokio::test]
    async fn test_auto_register_disabled() {
        let config = SessionConfig {
            auto_register_unknown: false,
            ..SessionConfig::instant()
        };
        let mut store = SessionStore::open(
            MemoryDirectory::seeded(),
            MemoryStorage::new(),
            NoLatency,
            config,
        );

        let err = store.sign_in("stranger@x.com", "pw").await.unwrap_err();
        assert_eq!(err.as_auth(), Some(&AuthError::InvalidCredentials));
        assert_eq!(store.state(), SessionState::Unauthenticated);
        assert_eq!(store.directory().len(), 1);

        // Known emails still work
        store.sign_in("demo@example.com", "pw").await.unwrap();
        assert!(store.session().is_authenticated());
    }

    #[test]
    fn test_restore_stored_identity() {
        let record = serde_json::to_string(&Identity::demo()).unwrap();
        let mut store = SessionStore::new(
            MemoryDirectory::new(),
            MemoryStorage::with_entry("user", record),
            NoLatency,
            SessionConfig::instant(),
        );
        assert_eq!(store.state(), SessionState::Restoring);
        assert!(store.is_loading());

        let session = store.restore();
        assert_eq!(session.state, SessionState::Authenticated);
        assert_eq!(session.identity, Some(Identity::demo()));
        assert!(!session.loading);
    }

    #[test]
    fn test_restore_discards_corrupt_record() {
        let store = SessionStore::open(
            MemoryDirectory::new(),
            MemoryStorage::with_entry("user", "{not json"),
            NoLatency,
            SessionConfig::instant(),
        );

        assert_eq!(store.state(), SessionState::Unauthenticated);
        assert!(store.storage().is_empty());
    }

    #[test]
    fn test_restore_with_unavailable_storage() {
        let store = SessionStore::open(
            MemoryDirectory::new(),
            MemoryStorage::unavailable(),
            NoLatency,
            SessionConfig::instant(),
        );
        assert_eq!(store.state(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_directory_unchanged() {
        let mut store = SessionStore::open(
            MemoryDirectory::seeded(),
            MemoryStorage::unavailable(),
            NoLatency,
            SessionConfig::instant(),
        );

        let err = store.sign_up("Bo", "bo@x.com", "pw", "Org").await.unwrap_err();
        assert!(matches!(err, XrayError::Storage(_)));
        assert_eq!(store.directory().len(), 1);
        assert_eq!(store.state(), SessionState::Unauthenticated);
        assert!(store.sign_out().is_err());
    }

    #[tokio::test]
    async fn test_failed_reauthentication_keeps_current_identity() {
        let mut store = MemorySessionStore::new_for_testing();
        store.sign_in("demo@example.com", "pw").await.unwrap();

        store.sign_up("Ann", "demo@example.com", "pw", "Acme").await.unwrap_err();

        assert_eq!(store.state(), SessionState::Authenticated);
        assert_eq!(store.identity(), Some(&Identity::demo()));
        assert_eq!(stored_identity(&store), Some(Identity::demo()));
    }

    #[test]
    fn test_observers_see_each_transition() {
        let mut store = MemorySessionStore::new_for_testing();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&seen);
        let id = store.subscribe(move |event| {
            log.borrow_mut()
                .push((event.kind, event.session.state, event.session.loading));
        });

        block_on(store.sign_in("demo@example.com", "pw")).unwrap();
        store.sign_out().unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                (SessionEventKind::AuthenticationStarted, SessionState::Authenticating, true),
                (SessionEventKind::SignedIn, SessionState::Authenticated, false),
                (SessionEventKind::SignedOut, SessionState::Unauthenticated, false),
            ]
        );

        assert!(store.unsubscribe(id));
        block_on(store.sign_in("demo@example.com", "pw")).unwrap();
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_restore_notifies_listeners() {
        let mut store = SessionStore::new(
            MemoryDirectory::new(),
            MemoryStorage::new(),
            NoLatency,
            SessionConfig::instant(),
        );
        let kinds = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&kinds);
        store.subscribe(move |event| log.borrow_mut().push(event.kind));

        store.restore();
        assert_eq!(*kinds.borrow(), vec![SessionEventKind::Restored]);
    }
}
