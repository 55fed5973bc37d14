//! Utility functions for WASM module

/// Set up better panic messages in debug mode
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
