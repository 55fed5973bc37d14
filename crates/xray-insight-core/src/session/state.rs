//! Session state types

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::identity::Identity;

// ----------------------------------------------------------------------------
// Session State
// ----------------------------------------------------------------------------

/// Phase of the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No identity; sign-in affordances shown
    Unauthenticated,
    /// Reading the stored identity at startup
    Restoring,
    /// Waiting on a simulated sign-in or sign-up round trip
    Authenticating,
    /// An identity is current and persisted
    Authenticated,
}

impl SessionState {
    /// Whether the view should show a busy indicator
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Restoring | SessionState::Authenticating)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Restoring => "restoring",
            SessionState::Authenticating => "authenticating",
            SessionState::Authenticated => "authenticated",
        };
        f.write_str(label)
    }
}

// ----------------------------------------------------------------------------
// Session Snapshot
// ----------------------------------------------------------------------------

/// Point-in-time view of the session handed to observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub state: SessionState,
    pub identity: Option<Identity>,
    pub loading: bool,
}

impl Session {
    pub(crate) fn snapshot(state: SessionState, identity: Option<&Identity>) -> Self {
        Self {
            state,
            identity: identity.cloned(),
            loading: state.is_loading(),
        }
    }

    /// Whether an identity is signed in
    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }
}
