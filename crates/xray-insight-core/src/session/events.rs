//! Session change notifications
//!
//! Consumers subscribe explicitly and receive every state change in
//! subscription order. Listeners run synchronously on the thread that mutated
//! the store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Session;

/// What caused a session change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEventKind {
    /// Startup restoration finished
    Restored,
    /// A sign-in or sign-up started its round trip
    AuthenticationStarted,
    SignedIn,
    SignedUp,
    /// A sign-in or sign-up was rejected
    AuthenticationFailed,
    SignedOut,
}

/// Notification delivered to session listeners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub kind: SessionEventKind,
    pub session: Session,
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Callback receiving session events
pub type SessionListener = Box<dyn FnMut(&SessionEvent)>;

/// Ordered registry of session listeners
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    listeners: BTreeMap<SubscriptionId, SessionListener>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; ids grow monotonically, so map order is
    /// subscription order
    pub fn subscribe(&mut self, listener: SessionListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id, listener);
        id
    }

    /// Remove a listener, returning whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Deliver an event to every listener in subscription order
    pub fn emit(&mut self, event: &SessionEvent) {
        for listener in self.listeners.values_mut() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl core::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscribers")
            .field("next_id", &self.next_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
