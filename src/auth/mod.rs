//! Credential sign-in
//!
//! [`AuthProvider`] is the seam to whatever checks credentials. It reports
//! success as an explicit [`SignIn`] value and failure as a tagged
//! [`AuthError`]; callers never inspect error text to tell them apart.
//! [`LoginAction`] turns the result into the form's user-facing message.

pub mod action;
pub mod credentials;

pub use action::{AUTH_ERROR, INVALID_CREDENTIALS, LoginAction, LoginOutcome};
pub use credentials::CredentialsProvider;

use crate::core::form::FormData;
use async_trait::async_trait;
use std::fmt;

/// Successful sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignIn {
    /// Signed in; continue at `location`
    Redirect { location: String },
}

/// Provider-classified failure kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// Wrong, unknown or malformed credentials
    CredentialsSignin,
    /// The credentials check itself failed (e.g. the user lookup errored)
    CallbackRouteError,
    /// The account is not allowed to sign in
    AccessDenied,
    /// Provider misconfiguration
    Configuration,
    /// Any other classified kind
    Other(String),
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthErrorKind::CredentialsSignin => f.write_str("CredentialsSignin"),
            AuthErrorKind::CallbackRouteError => f.write_str("CallbackRouteError"),
            AuthErrorKind::AccessDenied => f.write_str("AccessDenied"),
            AuthErrorKind::Configuration => f.write_str("Configuration"),
            AuthErrorKind::Other(kind) => f.write_str(kind),
        }
    }
}

/// Sign-in failure
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A failure the provider classified
    #[error("authentication failed: {0}")]
    Classified(AuthErrorKind),

    /// Anything the provider could not classify
    #[error("unexpected sign-in failure: {0}")]
    Unclassified(#[source] anyhow::Error),
}

impl AuthError {
    pub fn kind(&self) -> Option<&AuthErrorKind> {
        match self {
            AuthError::Classified(kind) => Some(kind),
            AuthError::Unclassified(_) => None,
        }
    }
}

/// Trait for credential-checking providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Check the submitted credentials
    async fn sign_in(&self, form: &FormData) -> Result<SignIn, AuthError>;
}
