//! Identity record

use serde::{Deserialize, Serialize};

use crate::types::IdentityId;

/// Profile record of an authenticated user
///
/// The serialized form matches the record the browser client keeps under its
/// storage key, so a session written by one client restores in the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Unique identifier within the directory
    pub id: IdentityId,
    /// Email used to sign in
    pub email: String,
    /// Display name given at registration
    #[serde(rename = "fullName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Identity {
    /// Create an identity without a display name
    pub fn new(id: IdentityId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: None,
        }
    }

    /// Attach a display name
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// The demo account every fresh directory starts with
    pub fn demo() -> Self {
        Self::new(IdentityId::new("1"), "demo@example.com").with_display_name("Demo User")
    }

    /// Name to greet the user with: display name if set, otherwise email
    pub fn greeting_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}
