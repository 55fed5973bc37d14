//! Auth flows
//!
//! The form-level handlers that sit between the view and the session store:
//! field validation, the terms checkbox, the success and failure notices, and
//! the route to show next. Social provider buttons are inert and only ever
//! produce an informational notice.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    errors::AuthError,
    identity::{ClientStorage, Identity, IdentityDirectory},
    latency::Latency,
    notice::{Notice, Notifier},
    session::SessionStore,
    Result, XrayError,
};

pub const LOGIN_SUCCESS: &str = "Login successful! Redirecting to dashboard...";
pub const LOGIN_FALLBACK: &str = "Invalid email or password";
pub const REGISTER_SUCCESS: &str = "Account created successfully! Redirecting to dashboard...";
pub const REGISTER_FALLBACK: &str = "Registration failed. Please try again.";

/// Where the view should go after a flow completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
        }
    }
}

/// Fields of the registration form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub full_name: String,
    pub work_email: String,
    pub password: String,
    pub company_name: String,
    pub agree_to_terms: bool,
}

impl RegistrationForm {
    /// Check the form the way the browser would before submitting
    pub fn validate(&self) -> core::result::Result<(), AuthError> {
        if !self.agree_to_terms {
            return Err(AuthError::TermsNotAccepted);
        }
        require("full name", &self.full_name)?;
        validate_email(&self.work_email)?;
        require("password", &self.password)?;
        require("company name", &self.company_name)?;
        Ok(())
    }
}

/// Validate login form fields
pub fn validate_login(email: &str, password: &str) -> core::result::Result<(), AuthError> {
    validate_email(email)?;
    require("password", password)
}

/// Present means non-empty; whitespace counts as a value
fn require(field: &'static str, value: &str) -> core::result::Result<(), AuthError> {
    if value.is_empty() {
        return Err(AuthError::MissingField { field });
    }
    Ok(())
}

/// Loose email shape check: something, one `@`, something with no spaces
///
/// Surrounding whitespace is ignored, as an email input strips it.
pub fn validate_email(email: &str) -> core::result::Result<(), AuthError> {
    let email = email.trim();
    require("email", email)?;
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !well_formed {
        return Err(AuthError::MalformedEmail {
            email: email.to_string(),
        });
    }
    Ok(())
}

// ----------------------------------------------------------------------------
// Auth Flow
// ----------------------------------------------------------------------------

/// Session store paired with the notifier the view displays notices through
pub struct AuthFlow<D, S, L, N> {
    store: SessionStore<D, S, L>,
    notifier: N,
}

impl<D, S, L, N> AuthFlow<D, S, L, N>
where
    D: IdentityDirectory,
    S: ClientStorage,
    L: Latency,
    N: Notifier,
{
    pub fn new(store: SessionStore<D, S, L>, notifier: N) -> Self {
        Self { store, notifier }
    }

    /// Submit the login form
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Route> {
        if let Err(e) = validate_login(email, password) {
            return Err(self.reject(e.into(), LOGIN_FALLBACK));
        }
        let email = email.trim();

        match self.store.sign_in(email, password).await {
            Ok(_) => {
                self.notifier.notify(&Notice::success(LOGIN_SUCCESS));
                Ok(Route::Dashboard)
            }
            Err(e) => Err(self.reject(e, LOGIN_FALLBACK)),
        }
    }

    /// Submit the registration form
    pub async fn register(&mut self, form: &RegistrationForm) -> Result<Route> {
        if let Err(e) = form.validate() {
            return Err(self.reject(e.into(), REGISTER_FALLBACK));
        }

        let outcome = self
            .store
            .sign_up(
                &form.full_name,
                form.work_email.trim(),
                &form.password,
                &form.company_name,
            )
            .await;

        match outcome {
            Ok(_) => {
                self.notifier.notify(&Notice::success(REGISTER_SUCCESS));
                Ok(Route::Dashboard)
            }
            Err(e) => Err(self.reject(e, REGISTER_FALLBACK)),
        }
    }

    /// Sign out and head back to the login page
    pub fn logout(&mut self) -> Result<Route> {
        self.store.sign_out()?;
        Ok(Route::Login)
    }

    /// Social login buttons are placeholders
    pub fn social_login(&mut self, provider: &str) {
        debug!(%provider, "Social login requested");
        self.notifier
            .notify(&Notice::info(format!("{provider} login is not implemented yet.")));
    }

    /// Social registration buttons are placeholders
    pub fn social_register(&mut self, provider: &str) {
        debug!(%provider, "Social registration requested");
        self.notifier.notify(&Notice::info(format!(
            "{provider} registration is not implemented yet."
        )));
    }

    /// Currently signed-in identity
    pub fn identity(&self) -> Option<&Identity> {
        self.store.identity()
    }

    pub fn store(&self) -> &SessionStore<D, S, L> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SessionStore<D, S, L> {
        &mut self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn into_parts(self) -> (SessionStore<D, S, L>, N) {
        (self.store, self.notifier)
    }

    fn reject(&mut self, error: XrayError, fallback: &str) -> XrayError {
        self.notifier
            .notify(&Notice::error(error.user_message(fallback)));
        error
    }
}
