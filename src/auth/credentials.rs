//! Email/password provider backed by the users table

use super::{AuthError, AuthErrorKind, AuthProvider, SignIn};
use crate::core::form::FormData;
use crate::core::service::UserStore;
use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

/// bcrypt cost factor for stored passwords
pub const HASH_COST: u32 = 10;

/// Shape the submitted credentials must have before any lookup
#[derive(Debug, Validate)]
struct CredentialsInput {
    #[validate(email)]
    email: String,
    #[validate(length(min = 6))]
    password: String,
}

/// Hash a password with bcrypt on a blocking thread
pub async fn hash_password(password: String, cost: u32) -> anyhow::Result<String> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

/// Check a password against a stored bcrypt hash on a blocking thread
pub async fn verify_password(password: String, hash: String) -> anyhow::Result<bool> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(matches)
}

/// Signs users in by email and bcrypt-hashed password
#[derive(Clone)]
pub struct CredentialsProvider {
    users: Arc<dyn UserStore>,
    default_redirect: String,
}

impl CredentialsProvider {
    pub fn new(users: Arc<dyn UserStore>, default_redirect: impl Into<String>) -> Self {
        Self {
            users,
            default_redirect: default_redirect.into(),
        }
    }

    /// Post-sign-in target: the form's `redirectTo` when it is a local path
    fn redirect_target(&self, form: &FormData) -> String {
        match form.get("redirectTo") {
            Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
            _ => self.default_redirect.clone(),
        }
    }
}

#[async_trait]
impl AuthProvider for CredentialsProvider {
    async fn sign_in(&self, form: &FormData) -> Result<SignIn, AuthError> {
        let input = CredentialsInput {
            email: form.get("email").unwrap_or_default().to_string(),
            password: form.get("password").unwrap_or_default().to_string(),
        };
        if let Err(errors) = input.validate() {
            tracing::debug!(%errors, "credentials rejected by schema");
            return Err(AuthError::Classified(AuthErrorKind::CredentialsSignin));
        }

        let user = self
            .users
            .find_by_email(&input.email)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to fetch user");
                AuthError::Classified(AuthErrorKind::CallbackRouteError)
            })?;

        let Some(user) = user else {
            tracing::debug!(email = %input.email, "no such user");
            return Err(AuthError::Classified(AuthErrorKind::CredentialsSignin));
        };

        let matches = verify_password(input.password, user.password)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "password verification failed");
                AuthError::Classified(AuthErrorKind::CallbackRouteError)
            })?;

        if !matches {
            tracing::debug!(email = %user.email, "password mismatch");
            return Err(AuthError::Classified(AuthErrorKind::CredentialsSignin));
        }

        tracing::info!(user_id = %user.id, "signed in");
        Ok(SignIn::Redirect {
            location: self.redirect_target(form),
        })
    }
}
