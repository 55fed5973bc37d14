//! Identity management for the XRay Insight client
//!
//! Three pieces make up the identity layer:
//! 1. Identity - the profile record of a signed-in user
//! 2. Directory - the known identities standing in for a backend user store
//! 3. Client storage - durable key-value storage holding the current identity

pub mod directory;
pub mod storage;
pub mod types;

pub use directory::{IdentityDirectory, MemoryDirectory};
pub use storage::{create_default_storage, create_test_storage, ClientStorage, MemoryStorage};
pub use types::Identity;
