//! Error types for the XRay Insight client
//!
//! This module contains all error types used by the core crate: authentication
//! errors raised by the session store and auth flows, client storage errors,
//! mock analysis errors, and the XrayError type that unifies them.

// ----------------------------------------------------------------------------
// Specific Error Types
// ----------------------------------------------------------------------------

/// Authentication error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("User with this email already exists")]
    DuplicateIdentity { email: String },
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Please fill out the {field} field.")]
    MissingField { field: &'static str },
    #[error("Please enter a valid email address.")]
    MalformedEmail { email: String },
    #[error("You must agree to the Terms of Service and Privacy Policy.")]
    TermsNotAccepted,
}

/// Client storage error types
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Client storage not available: {reason}")]
    NotAvailable { reason: String },
    #[error("Client storage quota exceeded")]
    QuotaExceeded,
    #[error("Client storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Client storage backend error: {message}")]
    Backend { message: String },
}

/// Mock analysis error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("No file selected")]
    NoImageSelected,
    #[error("Invalid file type: {media_type}")]
    UnsupportedFileType { media_type: String },
}

impl AnalysisError {
    /// Short title shown above the description in a notice
    pub fn title(&self) -> &'static str {
        match self {
            AnalysisError::NoImageSelected => "No file selected",
            AnalysisError::UnsupportedFileType { .. } => "Invalid file type",
        }
    }

    /// Longer description for the user
    pub fn description(&self) -> &'static str {
        match self {
            AnalysisError::NoImageSelected => "Please upload an X-ray image to analyze.",
            AnalysisError::UnsupportedFileType { .. } => "Please upload an image file.",
        }
    }
}

// ----------------------------------------------------------------------------
// Unified Error Type
// ----------------------------------------------------------------------------

/// Core error type for the XRay Insight client
#[derive(Debug, thiserror::Error)]
pub enum XrayError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },
}

// ----------------------------------------------------------------------------
// Convenience Error Constructors
// ----------------------------------------------------------------------------

impl XrayError {
    /// Create a duplicate identity error for an email
    pub fn duplicate_identity<T: Into<String>>(email: T) -> Self {
        XrayError::Auth(AuthError::DuplicateIdentity {
            email: email.into(),
        })
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials() -> Self {
        XrayError::Auth(AuthError::InvalidCredentials)
    }

    /// Create a storage backend error with a message
    pub fn storage_error<T: Into<String>>(message: T) -> Self {
        XrayError::Storage(StorageError::Backend {
            message: message.into(),
        })
    }

    /// Create a storage unavailable error with a reason
    pub fn storage_unavailable<T: Into<String>>(reason: T) -> Self {
        XrayError::Storage(StorageError::NotAvailable {
            reason: reason.into(),
        })
    }

    /// Create a configuration error with a reason
    pub fn config_error<T: Into<String>>(reason: T) -> Self {
        XrayError::Configuration {
            reason: reason.into(),
        }
    }

    /// Authentication error, if this is one
    pub fn as_auth(&self) -> Option<&AuthError> {
        match self {
            XrayError::Auth(err) => Some(err),
            _ => None,
        }
    }

    /// Whether this is a duplicate identity rejection
    pub fn is_duplicate_identity(&self) -> bool {
        matches!(self, XrayError::Auth(AuthError::DuplicateIdentity { .. }))
    }

    /// The single human-readable message the view layer shows for this error
    ///
    /// Authentication and analysis errors carry their own wording; anything
    /// else collapses to the fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            XrayError::Auth(err) => err.to_string(),
            XrayError::Analysis(err) => err.description().to_string(),
            _ => fallback.to_string(),
        }
    }
}

// ----------------------------------------------------------------------------
// Type Aliases
// ----------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, XrayError>;
