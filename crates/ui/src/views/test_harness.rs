use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::api::{
    AttemptRecorder, AuthApi, ContentApi, GenerateRequest, MaterialApi, MaterialDraft,
    MaterialPage, MaterialUpdate, Pagination, StatusCode, UploadReceipt, UploadSource,
};
use services::library::{folders_of, tags_of};
use services::{
    ApiError, AuthService, Clock, LibraryService, MaterialQuery, MaterialStats,
    SessionTokenProvider, StudyService, UploadService,
};
use storage::repository::Storage;
use study_core::model::{
    AccessToken, Content, ContentId, ContentKind, Credentials, Flashcard, JobStatus,
    MaterialData, MaterialId, MaterialKind, ProcessingStatus, QuizAttempt, QuizQuestion,
    StudyMaterial, SummaryType, User, UserId,
};
use study_core::time::fixed_now;

use crate::context::{UiApp, build_app_context};
use crate::platform::{LinkOpenerRef, UiLinkOpener};
use crate::routes::Route;
use crate::views::{
    ContentDetailView, FlashcardsView, HistoryView, LibraryView, QuizView, SummaryView,
};

fn material(id: &str, title: &str, data: MaterialData) -> StudyMaterial {
    StudyMaterial {
        id: MaterialId::new(id).unwrap(),
        content_id: ContentId::new("c1").unwrap(),
        title: title.into(),
        folder: Some("Biology".into()),
        tags: vec!["exam".into()],
        created_at: fixed_now(),
        data,
    }
}

/// A deck, a two-question quiz, a deck with no cards and a summary.
pub fn sample_materials() -> Vec<StudyMaterial> {
    let options = || vec!["Mars".to_string(), "Jupiter".to_string(), "Venus".to_string()];
    vec![
        material(
            "deck",
            "Cell biology",
            MaterialData::Flashcards(vec![
                Flashcard::new("What is the powerhouse of the cell?", "Mitochondria").unwrap(),
                Flashcard::new("What carries genetic code?", "DNA").unwrap(),
            ]),
        ),
        material(
            "quiz",
            "Planets",
            MaterialData::Quiz(vec![
                QuizQuestion::new("Largest planet?", options(), 1, Some("It is a gas giant.".into()))
                    .unwrap(),
                QuizQuestion::new("Red planet?", options(), 0, None).unwrap(),
            ]),
        ),
        material("empty", "Empty deck", MaterialData::Flashcards(Vec::new())),
        material(
            "notes",
            "Photosynthesis notes",
            MaterialData::Summary {
                text: "Plants turn **light** into sugar.".into(),
                summary_type: SummaryType::Short,
                key_concepts: vec!["Chlorophyll".into()],
            },
        ),
    ]
}

#[derive(Default)]
pub struct FakeBackend {
    materials: Mutex<Vec<StudyMaterial>>,
}

impl FakeBackend {
    fn with_materials(materials: Vec<StudyMaterial>) -> Self {
        Self {
            materials: Mutex::new(materials),
        }
    }

    fn find(&self, id: &MaterialId) -> Result<StudyMaterial, ApiError> {
        self.materials
            .lock()
            .unwrap()
            .iter()
            .find(|m| &m.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: StatusCode::NOT_FOUND,
                message: "Material not found".into(),
            })
    }

    fn content() -> Content {
        Content {
            id: ContentId::new("c1").unwrap(),
            title: "Lecture notes".into(),
            kind: ContentKind::Pdf,
            status: ProcessingStatus::Completed,
            source_url: None,
            created_at: fixed_now(),
        }
    }
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn login(&self, email: &str, _password: &str) -> Result<Credentials, ApiError> {
        Ok(Credentials {
            access_token: AccessToken::new("token"),
            user: User {
                id: UserId::new("u-1").unwrap(),
                email: email.into(),
                name: "Ada".into(),
                created_at: fixed_now(),
            },
        })
    }

    async fn register(
        &self,
        _name: &str,
        email: &str,
        password: &str,
    ) -> Result<Credentials, ApiError> {
        self.login(email, password).await
    }
}

#[async_trait]
impl MaterialApi for FakeBackend {
    async fn list_materials(&self, _query: &MaterialQuery) -> Result<MaterialPage, ApiError> {
        let materials = self.materials.lock().unwrap().clone();
        let total = u32::try_from(materials.len()).unwrap();
        Ok(MaterialPage {
            materials,
            pagination: Pagination {
                page: 1,
                limit: 20,
                total,
                total_pages: 1,
            },
        })
    }

    async fn get_material(&self, id: &MaterialId) -> Result<StudyMaterial, ApiError> {
        self.find(id)
    }

    async fn update_material(
        &self,
        id: &MaterialId,
        _update: &MaterialUpdate,
    ) -> Result<StudyMaterial, ApiError> {
        self.find(id)
    }

    async fn delete_material(&self, id: &MaterialId) -> Result<(), ApiError> {
        self.materials.lock().unwrap().retain(|m| &m.id != id);
        Ok(())
    }

    async fn folders(&self) -> Result<Vec<String>, ApiError> {
        Ok(folders_of(&self.materials.lock().unwrap()))
    }

    async fn tags(&self) -> Result<Vec<String>, ApiError> {
        Ok(tags_of(&self.materials.lock().unwrap()))
    }

    async fn stats(&self) -> Result<MaterialStats, ApiError> {
        Ok(MaterialStats::from_materials(&self.materials.lock().unwrap()))
    }

    async fn generate(
        &self,
        _content_id: &ContentId,
        kind: MaterialKind,
        _request: &GenerateRequest,
    ) -> Result<MaterialData, ApiError> {
        self.materials
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.kind() == kind)
            .map(|m| m.data.clone())
            .ok_or(ApiError::EmptyResponse)
    }

    async fn save_generated(
        &self,
        content_id: &ContentId,
        draft: &MaterialDraft,
    ) -> Result<StudyMaterial, ApiError> {
        let mut saved = material("saved", &draft.title, draft.data.clone());
        saved.content_id = content_id.clone();
        self.materials.lock().unwrap().push(saved.clone());
        Ok(saved)
    }
}

#[async_trait]
impl ContentApi for FakeBackend {
    async fn list_contents(&self) -> Result<Vec<Content>, ApiError> {
        Ok(vec![Self::content()])
    }

    async fn get_content(&self, _id: &ContentId) -> Result<Content, ApiError> {
        Ok(Self::content())
    }

    async fn delete_content(&self, _id: &ContentId) -> Result<(), ApiError> {
        Ok(())
    }

    async fn upload(&self, _source: &UploadSource) -> Result<UploadReceipt, ApiError> {
        Ok(UploadReceipt {
            content: Some(Self::content()),
            job_id: None,
        })
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatus, ApiError> {
        Ok(JobStatus {
            job_id: job_id.to_string(),
            status: ProcessingStatus::Completed,
            progress: Some(100),
            error: None,
        })
    }
}

#[async_trait]
impl AttemptRecorder for FakeBackend {
    async fn record_attempt(&self, _attempt: &QuizAttempt) -> Result<(), ApiError> {
        Ok(())
    }
}

struct NoopLinkOpener;

impl UiLinkOpener for NoopLinkOpener {
    fn open_url(&self, _url: &str) {}
}

#[derive(Clone)]
struct TestApp {
    auth: Arc<AuthService>,
    library: Arc<LibraryService>,
    study: Arc<StudyService>,
    uploads: Arc<UploadService>,
}

impl UiApp for TestApp {
    fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    fn library(&self) -> Arc<LibraryService> {
        Arc::clone(&self.library)
    }

    fn study(&self) -> Arc<StudyService> {
        Arc::clone(&self.study)
    }

    fn uploads(&self) -> Arc<UploadService> {
        Arc::clone(&self.uploads)
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::new(NoopLinkOpener)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    /// The full router at `/`.
    App,
    Library,
    Flashcards(String),
    Quiz(String),
    Summary(String),
    ContentDetail(String),
    History,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    if props.view == ViewKind::App {
        return rsx! { Router::<Route> {} };
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::App | ViewKind::Library => rsx! { LibraryView {} },
        ViewKind::Flashcards(id) => rsx! { FlashcardsView { id: id } },
        ViewKind::Quiz(id) => rsx! { QuizView { id: id } },
        ViewKind::Summary(id) => rsx! { SummaryView { id: id } },
        ViewKind::ContentDetail(id) => rsx! { ContentDetailView { id: id } },
        ViewKind::History => rsx! { HistoryView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub study: Arc<StudyService>,
}

impl ViewHarness {
    pub async fn settle(&mut self) {
        self.dom.rebuild_in_place();
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub async fn setup_view_harness(view: ViewKind, signed_in: bool) -> ViewHarness {
    let storage = Storage::in_memory();
    let backend = Arc::new(FakeBackend::with_materials(sample_materials()));
    let tokens = Arc::new(SessionTokenProvider::new(Arc::clone(&storage.credentials)));

    let auth = Arc::new(AuthService::new(backend.clone(), tokens));
    if signed_in {
        auth.login("ada@example.com", "secret").await.expect("login");
    }
    let study = Arc::new(StudyService::new(
        Clock::fixed(fixed_now()),
        backend.clone(),
        Arc::clone(&storage.attempts),
        backend.clone(),
    ));
    let app = Arc::new(TestApp {
        auth,
        library: Arc::new(LibraryService::new(backend.clone(), backend.clone())),
        study: Arc::clone(&study),
        uploads: Arc::new(UploadService::new(backend)),
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });
    ViewHarness { dom, study }
}
