use std::sync::Arc;

use storage::repository::Storage;
use study_core::model::User;

use crate::Clock;
use crate::api::{ApiClient, ApiConfig, AttemptRecorder, AuthApi, ContentApi, MaterialApi};
use crate::auth_service::AuthService;
use crate::error::AppServicesError;
use crate::library::LibraryService;
use crate::study_service::StudyService;
use crate::token::SessionTokenProvider;
use crate::upload_service::UploadService;

/// Assembles app-facing services around one API client and one token provider.
#[derive(Clone)]
pub struct AppServices {
    restored_user: Option<User>,
    auth: Arc<AuthService>,
    library: Arc<LibraryService>,
    study: Arc<StudyService>,
    uploads: Arc<UploadService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization, credential restore,
    /// or HTTP client construction fails.
    pub async fn new_sqlite(
        db_url: &str,
        api: ApiConfig,
        clock: Clock,
        quiz_minutes: u32,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(storage, api, clock, quiz_minutes).await
    }

    /// # Errors
    ///
    /// Returns `AppServicesError` if credential restore or HTTP client
    /// construction fails.
    pub async fn from_storage(
        storage: Storage,
        api: ApiConfig,
        clock: Clock,
        quiz_minutes: u32,
    ) -> Result<Self, AppServicesError> {
        let tokens = Arc::new(SessionTokenProvider::new(Arc::clone(&storage.credentials)));
        let restored_user = tokens.restore().await?;

        let client = Arc::new(ApiClient::new(api, Arc::clone(&tokens))?);
        let auth_api: Arc<dyn AuthApi> = client.clone();
        let material_api: Arc<dyn MaterialApi> = client.clone();
        let content_api: Arc<dyn ContentApi> = client.clone();
        let recorder: Arc<dyn AttemptRecorder> = client;

        let auth = Arc::new(AuthService::new(auth_api, tokens));
        let library = Arc::new(LibraryService::new(
            Arc::clone(&material_api),
            Arc::clone(&content_api),
        ));
        let study = Arc::new(
            StudyService::new(
                clock,
                material_api,
                Arc::clone(&storage.attempts),
                recorder,
            )
            .with_quiz_minutes(quiz_minutes),
        );
        let uploads = Arc::new(UploadService::new(content_api));

        Ok(Self {
            restored_user,
            auth,
            library,
            study,
            uploads,
        })
    }

    /// User signed in by a previous launch, if any.
    #[must_use]
    pub fn restored_user(&self) -> Option<&User> {
        self.restored_user.as_ref()
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn library(&self) -> Arc<LibraryService> {
        Arc::clone(&self.library)
    }

    #[must_use]
    pub fn study(&self) -> Arc<StudyService> {
        Arc::clone(&self.study)
    }

    #[must_use]
    pub fn uploads(&self) -> Arc<UploadService> {
        Arc::clone(&self.uploads)
    }
}
