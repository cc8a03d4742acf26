use std::sync::Arc;

use study_core::model::User;
use tracing::{info, warn};

use crate::api::AuthApi;
use crate::error::AuthError;
use crate::token::SessionTokenProvider;

/// Sign-in lifecycle: login and register set the token, logout clears it,
/// and `restore` picks up a previous launch's login.
#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn AuthApi>,
    tokens: Arc<SessionTokenProvider>,
}

impl AuthService {
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, tokens: Arc<SessionTokenProvider>) -> Self {
        Self { api, tokens }
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.tokens.user()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.tokens.is_signed_in()
    }

    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for blank input, `AuthError::Api` if the
    /// backend rejects the credentials, or `AuthError::Storage` if they cannot
    /// be saved.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = required("email", email)?;
        let password = required("password", password)?;

        let credentials = self.api.login(email, password).await?;
        let user = credentials.user.clone();
        self.tokens.set(credentials).await?;
        info!(user = %user.id, "signed in");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for blank input, `AuthError::Api` if the
    /// backend rejects the registration, or `AuthError::Storage` if the new
    /// credentials cannot be saved.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let name = required("name", name)?;
        let email = required("email", email)?;
        let password = required("password", password)?;

        let credentials = self.api.register(name, email, password).await?;
        let user = credentials.user.clone();
        self.tokens.set(credentials).await?;
        info!(user = %user.id, "registered");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if stored credentials cannot be removed.
    /// The in-memory session is gone either way, but a later `restore` would
    /// sign the user back in.
    pub async fn logout(&self) -> Result<(), AuthError> {
        if let Err(err) = self.tokens.clear().await {
            warn!(error = %err, "signed out, but stored credentials were not removed");
            return Err(err);
        }
        info!("signed out");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if stored credentials cannot be read.
    pub async fn restore(&self) -> Result<Option<User>, AuthError> {
        self.tokens.restore().await
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::MissingField(field));
    }
    Ok(trimmed)
}
