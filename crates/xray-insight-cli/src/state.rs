//! State persistence for the XRay Insight CLI
//!
//! The CLI's durable client storage: one JSON object of string keys to string
//! values in `<state_dir>/client_storage.json`, mirroring what the browser
//! keeps in `localStorage`. The whole file is rewritten on every change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use xray_insight_core::{errors::StorageError, ClientStorage};

/// File name of the storage map inside the state directory
pub const STORAGE_FILE: &str = "client_storage.json";

/// JSON-file-backed client storage
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the storage file in a state directory, creating nothing until the
    /// first write
    ///
    /// Never fails: a file that cannot be read or parsed opens as empty.
    pub fn open(state_dir: &Path) -> Self {
        let path = state_dir.join(STORAGE_FILE);
        let entries = Self::load_from_file(&path);
        debug!(path = %path.display(), entries = entries.len(), "Opened client storage");
        Self { path, entries }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn load_from_file(path: &Path) -> BTreeMap<String, String> {
        if !path.exists() {
            return BTreeMap::new();
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Storage file unreadable, starting empty");
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(entries) => entries,
            Err(e) => {
                // The next write replaces the malformed map
                warn!(path = %path.display(), error = %e, "Discarding malformed storage file");
                BTreeMap::new()
            }
        }
    }

    fn save_to_file(&self) -> xray_insight_core::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(StorageError::from)?;
        }

        let contents = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, contents).map_err(StorageError::from)?;
        Ok(())
    }
}

impl ClientStorage for FileStorage {
    fn store(&mut self, key: &str, value: String) -> xray_insight_core::Result<()> {
        let previous = self.entries.insert(key.to_string(), value);
        if let Err(e) = self.save_to_file() {
            // Keep memory in step with disk
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn retrieve(&self, key: &str) -> xray_insight_core::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn delete(&mut self, key: &str) -> xray_insight_core::Result<()> {
        let Some(old) = self.entries.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.save_to_file() {
            self.entries.insert(key.to_string(), old);
            return Err(e);
        }
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }
}
