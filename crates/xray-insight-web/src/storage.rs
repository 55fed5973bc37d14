//! Browser client storage
//!
//! `window.localStorage` behind the core `ClientStorage` port. Private
//! browsing modes and sandboxed iframes may deny access; the app then falls
//! back to in-memory storage for the page's lifetime.

use tracing::warn;

use xray_insight_core::{
    errors::StorageError, identity::create_default_storage, ClientStorage, XrayError,
};

/// `localStorage`-backed client storage
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    /// Open the window's `localStorage`
    pub fn local() -> xray_insight_core::Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| XrayError::storage_unavailable("no window object"))?;
        let storage = window
            .local_storage()
            .map_err(|e| XrayError::storage_unavailable(js_error_message(&e)))?
            .ok_or_else(|| XrayError::storage_unavailable("localStorage is disabled"))?;
        Ok(Self { storage })
    }
}

impl ClientStorage for BrowserStorage {
    fn store(&mut self, key: &str, value: String) -> xray_insight_core::Result<()> {
        self.storage.set_item(key, &value).map_err(|e| {
            let message = js_error_message(&e);
            if message.contains("QuotaExceeded") {
                StorageError::QuotaExceeded.into()
            } else {
                XrayError::storage_error(message)
            }
        })
    }

    fn retrieve(&self, key: &str) -> xray_insight_core::Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| XrayError::storage_error(js_error_message(&e)))
    }

    fn delete(&mut self, key: &str) -> xray_insight_core::Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| XrayError::storage_error(js_error_message(&e)))
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// `localStorage` when the browser grants it, in-memory storage otherwise
pub fn open_client_storage() -> Box<dyn ClientStorage> {
    match BrowserStorage::local() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            warn!("Falling back to in-memory storage: {}", e);
            create_default_storage()
        }
    }
}

fn js_error_message(value: &wasm_bindgen::JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &"name".into())
                .ok()
                .and_then(|name| name.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}
