//! Browser latency
//!
//! Simulated round trips wait on `setTimeout` through a JS promise. Native
//! builds of this crate (unit tests) resolve immediately.

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        use async_trait::async_trait;
        use core::time::Duration;
        use wasm_bindgen::JsValue;
        use wasm_bindgen_futures::JsFuture;
        use xray_insight_core::Latency;

        /// Latency backed by `window.setTimeout`
        #[derive(Debug, Clone, Copy, Default)]
        pub struct BrowserLatency;

        #[async_trait(?Send)]
        impl Latency for BrowserLatency {
            async fn pause(&self, duration: Duration) {
                if duration.is_zero() {
                    return;
                }
                let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
                let promise = js_sys::Promise::new(&mut |resolve, _reject| {
                    let scheduled = web_sys::window()
                        .ok_or_else(|| JsValue::from_str("no window"))
                        .and_then(|window| {
                            window.set_timeout_with_callback_and_timeout_and_arguments_0(
                                &resolve,
                                millis,
                            )
                        });
                    if scheduled.is_err() {
                        // No timer available; resolve now rather than hang
                        let _ = resolve.call0(&JsValue::NULL);
                    }
                });
                if let Err(e) = JsFuture::from(promise).await {
                    tracing::warn!("Latency timer failed: {:?}", e);
                }
            }
        }
    } else {
        /// Native stand-in for the browser timer
        pub type BrowserLatency = xray_insight_core::NoLatency;
    }
}
