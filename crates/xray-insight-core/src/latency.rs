//! Simulated backend latency
//!
//! Every "API call" in the client is a fixed wait followed by canned data. The
//! wait is the only suspension point in the session store and the analyzer,
//! so it is injected: tokio on native hosts, `setTimeout` in the browser, and
//! nothing at all in tests.

use async_trait::async_trait;
use core::time::Duration;

// ----------------------------------------------------------------------------
// Latency Trait
// ----------------------------------------------------------------------------

/// Deferred continuation used to model a network round trip
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Latency {
    /// Suspend for the given duration
    async fn pause(&self, duration: Duration);
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

/// Latency that resolves immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLatency;

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Latency for NoLatency {
    async fn pause(&self, _duration: Duration) {}
}

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        /// Latency backed by the tokio timer
        #[derive(Debug, Clone, Copy, Default)]
        pub struct TokioLatency;

        #[async_trait]
        impl Latency for TokioLatency {
            async fn pause(&self, duration: Duration) {
                if !duration.is_zero() {
                    tokio::time::sleep(duration).await;
                }
            }
        }
    }
}
