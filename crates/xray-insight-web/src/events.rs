//! Events forwarded to the JavaScript UI
//!
//! Every event reaches the UI callback as `{type, data}`. Session changes use
//! the change kind as their type (`signed_in`, `authentication_started`, ...)
//! with the session snapshot as data; notices use `notice`.

use serde::Serialize;
use wasm_bindgen::JsValue;

use xray_insight_core::{Notice, SessionEvent, SessionEventKind};

/// Event type used for notices
pub const NOTICE_EVENT: &str = "notice";

/// JavaScript-bound event
#[derive(Debug, Clone, PartialEq)]
pub struct WebEvent {
    pub event_type: String,
    pub data: serde_json::Value,
}

impl WebEvent {
    fn new(event_type: impl Into<String>, data: &impl Serialize) -> Self {
        Self {
            event_type: event_type.into(),
            data: serde_json::to_value(data).unwrap_or(serde_json::Value::Null),
        }
    }

    /// Post this event to a UI callback
    pub fn dispatch(&self, callback: &js_sys::Function) -> Result<(), JsValue> {
        let event_obj = js_sys::Object::new();
        js_sys::Reflect::set(
            &event_obj,
            &JsValue::from("type"),
            &JsValue::from(self.event_type.as_str()),
        )?;
        js_sys::Reflect::set(&event_obj, &JsValue::from("data"), &to_js(&self.data)?)?;

        callback.call1(&JsValue::NULL, &event_obj)?;
        Ok(())
    }
}

impl From<&SessionEvent> for WebEvent {
    fn from(event: &SessionEvent) -> Self {
        Self::new(session_event_type(event.kind), &event.session)
    }
}

impl From<&Notice> for WebEvent {
    fn from(notice: &Notice) -> Self {
        Self::new(NOTICE_EVENT, notice)
    }
}

fn session_event_type(kind: SessionEventKind) -> &'static str {
    match kind {
        SessionEventKind::Restored => "restored",
        SessionEventKind::AuthenticationStarted => "authentication_started",
        SessionEventKind::SignedIn => "signed_in",
        SessionEventKind::SignedUp => "signed_up",
        SessionEventKind::AuthenticationFailed => "authentication_failed",
        SessionEventKind::SignedOut => "signed_out",
    }
}

/// Convert to a plain JS value (objects, not `Map`s)
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use xray_insight_core::{Identity, MemorySessionStore, SessionState};

    #[test]
    fn test_session_event_shape() {
        let mut store = MemorySessionStore::new_for_testing();
        let events = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = events.clone();
        store.subscribe(move |event| sink.borrow_mut().push(WebEvent::from(event)));

        futures::executor::block_on(store.sign_in("demo@example.com", "pw")).unwrap();

        let events = events.borrow();
        let types: Vec<_> = events.iter().map(|e| e.event_type.as_str()).collect();
        assert_eq!(types, ["authentication_started", "signed_in"]);
        assert_eq!(events[0].data["loading"], true);
        assert_eq!(events[1].data["state"], "authenticated");
        assert_eq!(events[1].data["identity"]["fullName"], "Demo User");
    }

    #[test]
    fn test_notice_event_shape() {
        let event = WebEvent::from(&Notice::error("Invalid email or password"));
        assert_eq!(event.event_type, NOTICE_EVENT);
        assert_eq!(
            event.data,
            serde_json::json!({"kind": "error", "message": "Invalid email or password"})
        );
    }

    #[test]
    fn test_every_kind_has_a_type() {
        let session = xray_insight_core::Session {
            state: SessionState::Unauthenticated,
            identity: None::<Identity>,
            loading: false,
        };
        for kind in [
            SessionEventKind::Restored,
            SessionEventKind::AuthenticationFailed,
            SessionEventKind::SignedOut,
        ] {
            let event = WebEvent::from(&SessionEvent {
                kind,
                session: session.clone(),
            });
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::Value::from(event.event_type)
            );
        }
    }

}
