//! The `authenticate` form action

use super::{AuthError, AuthErrorKind, AuthProvider, SignIn};
use crate::core::form::FormData;
use crate::core::state::{ActionOutcome, FormState};
use std::sync::Arc;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const AUTH_ERROR: &str = "Authentication Error";

/// Result of a sign-in attempt as the form sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Signed in; navigate to `location`
    Redirect(String),
    /// Stay on the form and show this message
    Rejected(String),
}

impl LoginOutcome {
    /// Message for the form, `None` on success
    pub fn message(&self) -> Option<&str> {
        match self {
            LoginOutcome::Redirect(_) => None,
            LoginOutcome::Rejected(message) => Some(message),
        }
    }
}

impl From<LoginOutcome> for ActionOutcome {
    fn from(outcome: LoginOutcome) -> Self {
        match outcome {
            LoginOutcome::Redirect(location) => ActionOutcome::Redirect { location },
            LoginOutcome::Rejected(message) => ActionOutcome::State(FormState::message(message)),
        }
    }
}

/// Sign-in action over an [`AuthProvider`]
#[derive(Clone)]
pub struct LoginAction {
    provider: Arc<dyn AuthProvider>,
}

impl LoginAction {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self { provider }
    }

    /// `authenticate`: `None` on success, otherwise the message to show
    pub async fn authenticate(&self, _previous: Option<&str>, form: &FormData) -> Option<String> {
        self.login(form).await.message().map(str::to_owned)
    }

    /// Sign in and keep the redirect target on success
    pub async fn login(&self, form: &FormData) -> LoginOutcome {
        match self.provider.sign_in(form).await {
            Ok(SignIn::Redirect { location }) => LoginOutcome::Redirect(location),
            Err(e) => {
                tracing::error!(error = %e, "Authentication Error");
                LoginOutcome::Rejected(message_for(&e).to_string())
            }
        }
    }
}

fn message_for(error: &AuthError) -> &'static str {
    match error.kind() {
        Some(AuthErrorKind::CredentialsSignin) => INVALID_CREDENTIALS,
        Some(_) | None => AUTH_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Provider that answers every sign-in with a fixed result
    struct FixedProvider(fn() -> Result<SignIn, AuthError>);

    #[async_trait]
    impl AuthProvider for FixedProvider {
        async fn sign_in(&self, _form: &FormData) -> Result<SignIn, AuthError> {
            (self.0)()
        }
    }

    fn action(result: fn() -> Result<SignIn, AuthError>) -> LoginAction {
        LoginAction::new(Arc::new(FixedProvider(result)))
    }

    #[tokio::test]
    async fn test_redirect_is_success() {
        let action = action(|| {
            Ok(SignIn::Redirect {
                location: "/dashboard".into(),
            })
        });
        assert_eq!(action.authenticate(None, &FormData::new()).await, None);
        assert_eq!(
            action.login(&FormData::new()).await,
            LoginOutcome::Redirect("/dashboard".into())
        );
    }

    #[tokio::test]
    async fn test_credentials_signin_maps_to_invalid_credentials() {
        let action = action(|| Err(AuthError::Classified(AuthErrorKind::CredentialsSignin)));
        assert_eq!(
            action.authenticate(None, &FormData::new()).await.as_deref(),
            Some(INVALID_CREDENTIALS)
        );
    }

    #[tokio::test]
    async fn test_other_classified_kinds_map_to_auth_error() {
        for result in [
            (|| Err(AuthError::Classified(AuthErrorKind::CallbackRouteError)))
                as fn() -> Result<SignIn, AuthError>,
            || Err(AuthError::Classified(AuthErrorKind::AccessDenied)),
            || Err(AuthError::Classified(AuthErrorKind::Other("Verification".into()))),
        ] {
            assert_eq!(
                action(result)
                    .authenticate(Some(INVALID_CREDENTIALS), &FormData::new())
                    .await
                    .as_deref(),
                Some(AUTH_ERROR)
            );
        }
    }

    #[tokio::test]
    async fn test_unclassified_maps_to_auth_error() {
        let action = action(|| Err(AuthError::Unclassified(anyhow::anyhow!("socket closed"))));
        assert_eq!(
            action.authenticate(None, &FormData::new()).await.as_deref(),
            Some(AUTH_ERROR)
        );
    }

    #[test]
    fn test_outcome_into_action() {
        let outcome: ActionOutcome = LoginOutcome::Rejected(AUTH_ERROR.into()).into();
        assert_eq!(outcome.state().unwrap().message.as_deref(), Some(AUTH_ERROR));
    }
}
