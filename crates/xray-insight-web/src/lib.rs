//! XRay Insight WebAssembly Frontend - Web Composition Root
//!
//! This crate wires the core session store, auth flows and mock analyzer to
//! the browser:
//! - `localStorage` as durable client storage
//! - `setTimeout` as the simulated backend latency
//! - A JavaScript callback receiving session events and notices
//! - `XrayWebApp`, the `#[wasm_bindgen]` API the UI calls

use wasm_bindgen::prelude::*;

mod app;
mod events;
mod latency;
mod storage;
mod utils;

pub use app::*;
pub use events::WebEvent;
pub use latency::BrowserLatency;
pub use storage::{open_client_storage, BrowserStorage};
pub use utils::*;

// Initialize WASM module
#[wasm_bindgen(start)]
pub fn main() {
    utils::set_panic_hook();

    // Set up tracing for WASM
    tracing_wasm::set_as_global_default();
}
