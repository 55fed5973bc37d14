//! Storage abstraction for the current identity
//!
//! Provides the durable client storage port the session store persists
//! through. Platform adapters live with their composition roots: browser
//! `localStorage` in the web crate, a JSON file in the CLI. The in-memory
//! implementation here serves tests and hosts without durable storage.

use std::collections::BTreeMap;

use crate::{XrayError, Result};

// ----------------------------------------------------------------------------
// Storage Trait
// ----------------------------------------------------------------------------

/// Key-value storage surviving client restarts
///
/// Values are whole records: writes replace, deletes remove. No transactions.
pub trait ClientStorage {
    /// Store a value under a key, replacing any previous value
    fn store(&mut self, key: &str, value: String) -> Result<()>;

    /// Retrieve the value stored under a key
    fn retrieve(&self, key: &str) -> Result<Option<String>>;

    /// Delete the value stored under a key (no-op when absent)
    fn delete(&mut self, key: &str) -> Result<()>;

    /// Check if storage is available and accessible
    fn is_available(&self) -> bool;
}

impl<S: ClientStorage + ?Sized> ClientStorage for Box<S> {
    fn store(&mut self, key: &str, value: String) -> Result<()> {
        (**self).store(key, value)
    }

    fn retrieve(&self, key: &str) -> Result<Option<String>> {
        (**self).retrieve(key)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

// ----------------------------------------------------------------------------
// Memory Storage Implementation
// ----------------------------------------------------------------------------

/// In-memory storage implementation for testing and fallback
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    data: BTreeMap<String, String>,
    available: bool,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
            available: true,
        }
    }

    /// Create storage that already holds one entry
    pub fn with_entry(key: &str, value: impl Into<String>) -> Self {
        let mut storage = Self::new();
        storage.data.insert(key.to_string(), value.into());
        storage
    }

    /// Create storage that rejects every operation
    pub fn unavailable() -> Self {
        Self {
            data: BTreeMap::new(),
            available: false,
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn ensure_available(&self) -> Result<()> {
        if !self.available {
            return Err(XrayError::storage_unavailable("memory storage disabled"));
        }
        Ok(())
    }
}

impl ClientStorage for MemoryStorage {
    fn store(&mut self, key: &str, value: String) -> Result<()> {
        self.ensure_available()?;
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Option<String>> {
        self.ensure_available()?;
        Ok(self.data.get(key).cloned())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.ensure_available()?;
        self.data.remove(key);
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

// ----------------------------------------------------------------------------
// Factory Functions
// ----------------------------------------------------------------------------

/// Create the fallback storage for hosts without a durable adapter
pub fn create_default_storage() -> Box<dyn ClientStorage> {
    Box::new(MemoryStorage::new())
}

/// Create a storage implementation for testing
pub fn create_test_storage() -> MemoryStorage {
    MemoryStorage::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let mut storage = create_test_storage();
        assert!(storage.is_available());

        storage.store("user", "{}".to_string()).unwrap();
        assert_eq!(storage.retrieve("user").unwrap().as_deref(), Some("{}"));

        // Whole-record replace
        storage.store("user", "[]".to_string()).unwrap();
        assert_eq!(storage.retrieve("user").unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.len(), 1);

        storage.delete("user").unwrap();
        assert!(storage.retrieve("user").unwrap().is_none());

        // Deleting a missing key is fine
        storage.delete("user").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_unavailable_storage() {
        let mut storage = MemoryStorage::unavailable();
        assert!(!storage.is_available());
        assert!(storage.store("user", String::new()).is_err());
        assert!(storage.retrieve("user").is_err());
        assert!(storage.delete("user").is_err());
    }

    #[test]
    fn test_boxed_storage() {
        let mut storage = create_default_storage();
        storage.store("k", "v".to_string()).unwrap();
        assert_eq!(storage.retrieve("k").unwrap().as_deref(), Some("v"));
    }
}
