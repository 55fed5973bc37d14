//! XRay Insight Web Application - Composition Root
//!
//! `XrayWebApp` is the object the JavaScript UI holds for the page's
//! lifetime. It restores the session from `localStorage` on construction and
//! forwards every session change and notice to the UI callback, so the view
//! re-renders from events rather than polling.

use tracing::{info, warn};
use wasm_bindgen::prelude::*;

use xray_insight_core::{
    dashboard::{self, AnalysisRecord, DashboardSummary},
    AnalysisError, AuthFlow, ClientStorage, ImageUpload, MemoryDirectory, MockAnalyzer, Notice,
    Notifier, RegistrationForm, SessionStore, XrayConfig, XrayError,
};

use crate::{
    events::{to_js, WebEvent},
    latency::BrowserLatency,
    storage::open_client_storage,
};

type WebAuthFlow = AuthFlow<MemoryDirectory, Box<dyn ClientStorage>, BrowserLatency, JsNotifier>;

// ----------------------------------------------------------------------------
// Notice Forwarding
// ----------------------------------------------------------------------------

/// Notifier posting notices to the UI callback
pub struct JsNotifier {
    callback: js_sys::Function,
}

impl Notifier for JsNotifier {
    fn notify(&mut self, notice: &Notice) {
        if let Err(e) = WebEvent::from(notice).dispatch(&self.callback) {
            warn!("UI callback rejected notice: {:?}", e);
        }
    }
}

// ----------------------------------------------------------------------------
// XRay Insight Web Application
// ----------------------------------------------------------------------------

/// Main XRay Insight Web Application
#[wasm_bindgen]
pub struct XrayWebApp {
    flow: WebAuthFlow,
    analyzer: MockAnalyzer<BrowserLatency>,
    records: Vec<AnalysisRecord>,
}

#[wasm_bindgen]
impl XrayWebApp {
    /// Create the application with default configuration
    #[wasm_bindgen(constructor)]
    pub fn new(ui_callback: js_sys::Function) -> Result<XrayWebApp, JsValue> {
        Self::build(XrayConfig::default(), ui_callback)
    }

    /// Create the application from a configuration object
    #[wasm_bindgen]
    pub fn with_config(config: JsValue, ui_callback: js_sys::Function) -> Result<XrayWebApp, JsValue> {
        let config: XrayConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid configuration: {}", e)))?;
        Self::build(config, ui_callback)
    }

    /// Submit the login form; resolves to the route to show next
    #[wasm_bindgen]
    pub async fn sign_in(&mut self, email: String, password: String) -> Result<String, JsValue> {
        let route = self.flow.login(&email, &password).await.map_err(to_js_error)?;
        Ok(route.path().to_string())
    }

    /// Submit the registration form (`{fullName, workEmail, password,
    /// companyName, agreeToTerms}`); resolves to the route to show next
    #[wasm_bindgen]
    pub async fn sign_up(&mut self, form: JsValue) -> Result<String, JsValue> {
        let form: RegistrationForm = serde_wasm_bindgen::from_value(form)
            .map_err(|e| JsValue::from_str(&format!("Invalid registration form: {}", e)))?;
        let route = self.flow.register(&form).await.map_err(to_js_error)?;
        Ok(route.path().to_string())
    }

    /// Sign out; resolves to the login route
    #[wasm_bindgen]
    pub fn sign_out(&mut self) -> Result<String, JsValue> {
        let route = self.flow.logout().map_err(to_js_error)?;
        Ok(route.path().to_string())
    }

    #[wasm_bindgen]
    pub fn social_login(&mut self, provider: &str) {
        self.flow.social_login(provider);
    }

    #[wasm_bindgen]
    pub fn social_register(&mut self, provider: &str) {
        self.flow.social_register(provider);
    }

    /// Current session snapshot `{state, identity, loading}`
    #[wasm_bindgen]
    pub fn session(&self) -> Result<JsValue, JsValue> {
        to_js(&self.flow.store().session())
    }

    /// Whether an identity is signed in
    #[wasm_bindgen]
    pub fn is_authenticated(&self) -> bool {
        self.flow.identity().is_some()
    }

    /// Run the mock analyzer; pass no file name when nothing is selected
    #[wasm_bindgen]
    pub async fn analyze(
        &mut self,
        file_name: Option<String>,
        media_type: String,
        bytes: Vec<u8>,
    ) -> Result<JsValue, JsValue> {
        let upload = match file_name {
            Some(name) => match ImageUpload::new(name, media_type, bytes) {
                Ok(upload) => Some(upload),
                Err(e) => return Err(self.reject_analysis(e)),
            },
            None => None,
        };

        match self.analyzer.analyze(upload.as_ref()).await {
            Ok(report) => {
                self.flow.notifier_mut().notify(&report.notice());
                to_js(&report)
            }
            Err(XrayError::Analysis(e)) => Err(self.reject_analysis(e)),
            Err(e) => Err(to_js_error(e)),
        }
    }

    /// Dashboard records matching a search query
    #[wasm_bindgen]
    pub fn records(&self, query: Option<String>) -> Result<JsValue, JsValue> {
        let matches = dashboard::search(&self.records, query.as_deref().unwrap_or_default());
        to_js(&matches)
    }

    /// Headline counts `{total, abnormal, normal}`
    #[wasm_bindgen]
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        to_js(&DashboardSummary::from_records(&self.records))
    }
}

impl XrayWebApp {
    fn build(config: XrayConfig, ui_callback: js_sys::Function) -> Result<XrayWebApp, JsValue> {
        config.validate().map_err(to_js_error)?;

        let mut store = SessionStore::new(
            MemoryDirectory::from_config(&config.session),
            open_client_storage(),
            BrowserLatency::default(),
            config.session.clone(),
        );

        let session_callback = ui_callback.clone();
        store.subscribe(move |event| {
            if let Err(e) = WebEvent::from(event).dispatch(&session_callback) {
                warn!("UI callback rejected session event: {:?}", e);
            }
        });
        let session = store.restore();
        info!(state = %session.state, "XRay Insight web app started");

        Ok(XrayWebApp {
            flow: AuthFlow::new(store, JsNotifier { callback: ui_callback }),
            analyzer: MockAnalyzer::new(BrowserLatency::default(), config.analysis),
            records: dashboard::canned_records(),
        })
    }

    fn reject_analysis(&mut self, error: AnalysisError) -> JsValue {
        self.flow
            .notifier_mut()
            .notify(&Notice::error(error.description()).titled(error.title()));
        JsValue::from_str(error.title())
    }
}

fn to_js_error(error: XrayError) -> JsValue {
    JsValue::from_str(&error.user_message(&error.to_string()))
}
