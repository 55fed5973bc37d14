//! Directory of known identities
//!
//! Stands in for the backend user store the client would talk to. The session
//! store only sees the [`IdentityDirectory`] trait, so every test can supply a
//! fresh directory and nothing lives in module-level state.

use super::Identity;
use crate::{config::SessionConfig, XrayError, Result};

// ----------------------------------------------------------------------------
// Directory Trait
// ----------------------------------------------------------------------------

/// Lookup and insert operations over known identities
pub trait IdentityDirectory {
    /// Find an identity by exact email match
    fn find_by_email(&self, email: &str) -> Option<Identity>;

    /// Insert a new identity, rejecting an email that is already known
    fn insert(&mut self, identity: Identity) -> Result<()>;

    /// Number of known identities
    fn len(&self) -> usize;

    /// Whether the directory is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ----------------------------------------------------------------------------
// Memory Directory Implementation
// ----------------------------------------------------------------------------

/// In-memory directory preserving insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    identities: Vec<Identity>,
}

impl MemoryDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory holding the demo identity
    pub fn seeded() -> Self {
        Self {
            identities: vec![Identity::demo()],
        }
    }

    /// Create a directory as the session configuration asks for
    pub fn from_config(config: &SessionConfig) -> Self {
        if config.seed_demo_identity {
            Self::seeded()
        } else {
            Self::new()
        }
    }

    /// Create a directory from existing identities
    pub fn with_identities(identities: Vec<Identity>) -> Self {
        Self { identities }
    }

    /// All identities in insertion order
    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }
}

impl IdentityDirectory for MemoryDirectory {
    fn find_by_email(&self, email: &str) -> Option<Identity> {
        self.identities
            .iter()
            .find(|identity| identity.email == email)
            .cloned()
    }

    fn insert(&mut self, identity: Identity) -> Result<()> {
        if self.find_by_email(&identity.email).is_some() {
            return Err(XrayError::duplicate_identity(identity.email));
        }
        self.identities.push(identity);
        Ok(())
    }

    fn len(&self) -> usize {
        self.identities.len()
    }
}
