use std::sync::Arc;

use services::{AuthService, LibraryService, StudyService, UploadService};

use crate::platform::LinkOpenerRef;

/// What the composition root hands to the UI.
pub trait UiApp: Send + Sync {
    fn auth(&self) -> Arc<AuthService>;
    fn library(&self) -> Arc<LibraryService>;
    fn study(&self) -> Arc<StudyService>;
    fn uploads(&self) -> Arc<UploadService>;
    fn link_opener(&self) -> LinkOpenerRef;
}

#[derive(Clone)]
pub struct AppContext {
    auth: Arc<AuthService>,
    library: Arc<LibraryService>,
    study: Arc<StudyService>,
    uploads: Arc<UploadService>,
    link_opener: LinkOpenerRef,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            auth: app.auth(),
            library: app.library(),
            study: app.study(),
            uploads: app.uploads(),
            link_opener: app.link_opener(),
        }
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

    #[must_use]
    pub fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.link_opener)
    }
}

// Provided by the composition root (`crates/app`) via `LaunchBuilder::with_context`.

#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
