use std::sync::{Arc, RwLock};

use storage::repository::CredentialStore;
use study_core::model::{AccessToken, Credentials, User};
use tracing::debug;

use crate::error::AuthError;

/// Holds the bearer token for outgoing requests.
///
/// Reads come from an in-memory copy so request building never waits on
/// storage; writes go through to the backing `CredentialStore` first.
pub struct SessionTokenProvider {
    store: Arc<dyn CredentialStore>,
    current: RwLock<Option<Credentials>>,
}

impl SessionTokenProvider {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            current: RwLock::new(None),
        }
    }

    /// Token to attach to requests, if signed in.
    #[must_use]
    pub fn get(&self) -> Option<AccessToken> {
        self.current
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|c| c.access_token.clone()))
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.current
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|c| c.user.clone()))
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.get().is_some()
    }

    /// Persist and adopt new credentials.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the credentials cannot be stored.
    pub async fn set(&self, credentials: Credentials) -> Result<(), AuthError> {
        self.store.save(&credentials).await?;
        self.replace(Some(credentials));
        Ok(())
    }

    /// Forget the current credentials, both in memory and in the store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the stored credentials cannot be removed.
    pub async fn clear(&self) -> Result<(), AuthError> {
        self.replace(None);
        self.store.clear().await?;
        Ok(())
    }

    /// Load credentials saved by a previous launch.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the store cannot be read.
    pub async fn restore(&self) -> Result<Option<User>, AuthError> {
        let stored = self.store.load().await?;
        let user = stored.as_ref().map(|c| c.user.clone());
        debug!(restored = user.is_some(), "session token restore");
        self.replace(stored);
        Ok(user)
    }

    fn replace(&self, credentials: Option<Credentials>) {
        match self.current.write() {
            Ok(mut guard) => *guard = credentials,
            Err(poisoned) => *poisoned.into_inner() = credentials,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;
    use study_core::model::UserId;
    use study_core::time::fixed_now;

    fn credentials(token: &str) -> Credentials {
        Credentials {
            access_token: AccessToken::new(token),
            user: User {
                id: UserId::new("u-1").unwrap(),
                email: "ada@example.com".into(),
                name: "Ada".into(),
                created_at: fixed_now(),
            },
        }
    }

    #[tokio::test]
    async fn set_then_get_returns_token() {
        let store = Arc::new(InMemoryRepository::new());
        let tokens = SessionTokenProvider::new(store.clone());
        assert!(tokens.get().is_none());

        tokens.set(credentials("abc")).await.unwrap();

        assert_eq!(tokens.get().unwrap().expose(), "abc");
        assert_eq!(tokens.user().unwrap().name, "Ada");
        assert!(store.load().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn clear_removes_from_backing_store() {
        let store = Arc::new(InMemoryRepository::new());
        let tokens = SessionTokenProvider::new(store.clone());
        tokens.set(credentials("abc")).await.unwrap();

        tokens.clear().await.unwrap();

        assert!(tokens.get().is_none());
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn restore_picks_up_saved_credentials() {
        let store = Arc::new(InMemoryRepository::new());
        store.save(&credentials("saved")).await.unwrap();

        let tokens = SessionTokenProvider::new(store);
        let user = tokens.restore().await.unwrap();

        assert_eq!(user.unwrap().email, "ada@example.com");
        assert_eq!(tokens.get().unwrap().expose(), "saved");
    }
}
