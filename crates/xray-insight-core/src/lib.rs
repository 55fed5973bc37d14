//! XRay Insight Core
//!
//! This crate provides the client-side core of the XRay Insight demo: the
//! session store state machine with its identity directory and client storage
//! ports, the notification relay, the auth form flows, the mock analyzer and
//! the canned dashboard records. It is platform-agnostic; the CLI and web
//! crates supply storage and latency adapters for their hosts.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod analysis;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod identity;
pub mod latency;
pub mod notice;
pub mod session;
pub mod types;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use analysis::{media_type_for, AnalysisReport, Finding, ImageUpload, MockAnalyzer};
pub use auth::{AuthFlow, RegistrationForm, Route};
pub use config::{AnalysisConfig, SessionConfig, XrayConfig};
pub use dashboard::{canned_records, AnalysisRecord, DashboardSummary};
pub use errors::{AnalysisError, AuthError, Result, StorageError, XrayError};
pub use identity::{ClientStorage, Identity, IdentityDirectory, MemoryDirectory, MemoryStorage};
pub use latency::{Latency, NoLatency};
pub use notice::{Notice, NoticeKind, Notifier, RecordingNotifier, TracingNotifier};
pub use session::{
    MemorySessionStore, Session, SessionEvent, SessionEventKind, SessionState, SessionStore,
    SubscriptionId,
};
pub use types::{IdentityId, Timestamp};

#[cfg(feature = "std")]
pub use latency::TokioLatency;
