//! Session Module
//!
//! The client-side authentication state machine:
//! - `state`: session phases and the snapshot handed to observers
//! - `events`: change notifications and the ordered listener registry
//! - `store`: the store itself, generic over directory, storage and latency

pub mod events;
pub mod state;
pub mod store;

pub use events::{SessionEvent, SessionEventKind, SessionListener, Subscribers, SubscriptionId};
pub use state::{Session, SessionState};
pub use store::{MemorySessionStore, SessionStore};
