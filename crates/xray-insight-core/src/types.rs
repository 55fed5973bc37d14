//! Shared value types for the XRay Insight client

use core::fmt;
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Identity Identifier
// ----------------------------------------------------------------------------

/// Opaque identifier of a known identity
///
/// Serialized as a plain string so stored records stay readable by the browser
/// client that shares the same storage key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
    /// Create an identifier from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Allocate the identifier that follows a directory of `existing` entries
    pub fn sequential(existing: usize) -> Self {
        Self((existing + 1).to_string())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IdentityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ----------------------------------------------------------------------------
// Timestamp
// ----------------------------------------------------------------------------

/// Millisecond timestamp since Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a new timestamp
    pub fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// Get current timestamp (context-aware based on the target)
    pub fn now() -> Self {
        cfg_if::cfg_if! {
            if #[cfg(all(feature = "wasm", target_arch = "wasm32"))] {
                // SystemTime is unavailable in the browser
                Self(js_sys::Date::now() as u64)
            } else {
                use std::time::{SystemTime, UNIX_EPOCH};
                let duration = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default();
                Self(duration.as_millis() as u64)
            }
        }
    }

    /// Get the raw milliseconds
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Get duration since another timestamp
    pub fn duration_since(&self, other: Self) -> core::time::Duration {
        core::time::Duration::from_millis(self.0.saturating_sub(other.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        assert_eq!(IdentityId::sequential(0).as_str(), "1");
        assert_eq!(IdentityId::sequential(1).as_str(), "2");
        assert_eq!(IdentityId::sequential(41).to_string(), "42");
    }

    #[test]
    fn test_identity_id_serializes_as_string() {
        let id = IdentityId::new("7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }

    #[test]
    fn test_timestamp_ordering() {
        let earlier = Timestamp::new(1_000);
        let later = Timestamp::new(3_500);
        assert!(earlier < later);
        assert_eq!(later.duration_since(earlier).as_millis(), 2_500);
        assert_eq!(earlier.duration_since(later).as_millis(), 0);
        assert!(Timestamp::now().as_millis() > 0);
    }
}
