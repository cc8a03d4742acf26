//! In-process fakes for the backend traits, shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use study_core::model::{
    AccessToken, Content, ContentId, ContentKind, Credentials, Flashcard, JobStatus,
    MaterialData, MaterialId, MaterialKind, ProcessingStatus, QuizAttempt, QuizQuestion,
    StudyMaterial, User, UserId,
};
use study_core::time::fixed_now;

use crate::api::{
    AttemptRecorder, AuthApi, ContentApi, GenerateRequest, MaterialApi, MaterialDraft,
    MaterialPage, MaterialUpdate, Pagination, UploadReceipt, UploadSource,
};
use crate::error::ApiError;
use crate::library::{MaterialQuery, MaterialStats, folders_of, tags_of};

pub(crate) fn content(id: &str, title: &str) -> Content {
    Content {
        id: ContentId::new(id).unwrap(),
        title: title.into(),
        kind: ContentKind::Pdf,
        status: ProcessingStatus::Completed,
        source_url: None,
        created_at: fixed_now(),
    }
}

fn material(id: &str, title: &str, data: MaterialData) -> StudyMaterial {
    StudyMaterial {
        id: MaterialId::new(id).unwrap(),
        content_id: ContentId::new("c1").unwrap(),
        title: title.into(),
        folder: None,
        tags: Vec::new(),
        created_at: fixed_now(),
        data,
    }
}

pub(crate) fn flashcard_material(id: &str, title: &str) -> StudyMaterial {
    material(
        id,
        title,
        MaterialData::Flashcards(vec![
            Flashcard::new("2+2?", "4").unwrap(),
            Flashcard::new("3+3?", "6").unwrap(),
        ]),
    )
}

/// Two questions: the first answered by option 1, the second by option 0.
pub(crate) fn quiz_material(id: &str, title: &str) -> StudyMaterial {
    let options = || vec!["a".to_string(), "b".to_string(), "c".to_string()];
    material(
        id,
        title,
        MaterialData::Quiz(vec![
            QuizQuestion::new("Q1", options(), 1, Some("because".into())).unwrap(),
            QuizQuestion::new("Q2", options(), 0, None).unwrap(),
        ]),
    )
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    materials: Mutex<Vec<StudyMaterial>>,
    attempts: Mutex<Vec<QuizAttempt>>,
    job_script: Mutex<VecDeque<ProcessingStatus>>,
    auth_calls: AtomicUsize,
    reject_auth: AtomicBool,
    fail_recording: AtomicBool,
}

impl FakeBackend {
    pub(crate) fn with_materials(materials: Vec<StudyMaterial>) -> Self {
        Self {
            materials: Mutex::new(materials),
            ..Self::default()
        }
    }

    pub(crate) fn material_ids(&self) -> Vec<String> {
        self.materials
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.id.as_str().to_string())
            .collect()
    }

    pub(crate) fn reject_auth(&self) {
        self.reject_auth.store(true, Ordering::SeqCst);
    }

    pub(crate) fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_recording(&self) {
        self.fail_recording.store(true, Ordering::SeqCst);
    }

    pub(crate) fn recorded_attempts(&self) -> Vec<QuizAttempt> {
        self.attempts.lock().unwrap().clone()
    }

    pub(crate) fn script_job(&self, statuses: impl IntoIterator<Item = ProcessingStatus>) {
        self.job_script.lock().unwrap().extend(statuses);
    }

    fn credentials(&self, name: &str, email: &str) -> Result<Credentials, ApiError> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_auth.load(Ordering::SeqCst) {
            return Err(ApiError::Unauthorized);
        }
        Ok(Credentials {
            access_token: AccessToken::new(format!("token-for-{email}")),
            user: User {
                id: UserId::new("u-1").unwrap(),
                email: email.into(),
                name: name.into(),
                created_at: fixed_now(),
            },
        })
    }

    fn find(&self, id: &MaterialId) -> Result<StudyMaterial, ApiError> {
        self.materials
            .lock()
            .unwrap()
            .iter()
            .find(|m| &m.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: reqwest::StatusCode::NOT_FOUND,
                message: "Material not found".into(),
            })
    }
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn login(&self, email: &str, _password: &str) -> Result<Credentials, ApiError> {
        self.credentials("Ada", email)
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        _password: &str,
    ) -> Result<Credentials, ApiError> {
        self.credentials(name, email)
    }
}

#[async_trait]
impl MaterialApi for FakeBackend {
    // Ignores the query: callers are expected to filter again.
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
        update: &MaterialUpdate,
    ) -> Result<StudyMaterial, ApiError> {
        let mut materials = self.materials.lock().unwrap();
        let material = materials
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or(ApiError::EmptyResponse)?;
        if let Some(title) = &update.title {
            material.title.clone_from(title);
        }
        if let Some(folder) = &update.folder {
            material.folder = (!folder.is_empty()).then(|| folder.clone());
        }
        if let Some(tags) = &update.tags {
            material.tags.clone_from(tags);
        }
        Ok(material.clone())
    }

    async fn delete_material(&self, id: &MaterialId) -> Result<(), ApiError> {
        self.find(id)?;
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
        let sample = match kind {
            MaterialKind::Quiz => quiz_material("preview", "Preview"),
            _ => flashcard_material("preview", "Preview"),
        };
        Ok(sample.data)
    }

    async fn save_generated(
        &self,
        content_id: &ContentId,
        draft: &MaterialDraft,
    ) -> Result<StudyMaterial, ApiError> {
        let mut materials = self.materials.lock().unwrap();
        let saved = StudyMaterial {
            id: MaterialId::new(format!("saved-{}", materials.len() + 1)).unwrap(),
            content_id: content_id.clone(),
            title: draft.title.clone(),
            folder: draft.folder.clone(),
            tags: draft.tags.clone(),
            created_at: fixed_now(),
            data: draft.data.clone(),
        };
        materials.push(saved.clone());
        Ok(saved)
    }
}

#[async_trait]
impl ContentApi for FakeBackend {
    async fn list_contents(&self) -> Result<Vec<Content>, ApiError> {
        Ok(vec![content("c1", "Lecture notes")])
    }

    async fn get_content(&self, id: &ContentId) -> Result<Content, ApiError> {
        Ok(content(id.as_str(), "Lecture notes"))
    }

    async fn delete_content(&self, _id: &ContentId) -> Result<(), ApiError> {
        Ok(())
    }

    async fn upload(&self, source: &UploadSource) -> Result<UploadReceipt, ApiError> {
        let mut created = content("c-new", source.title());
        created.status = ProcessingStatus::Pending;
        Ok(UploadReceipt {
            content: Some(created),
            job_id: Some("job-1".into()),
        })
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatus, ApiError> {
        let status = self
            .job_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ProcessingStatus::Completed);
        Ok(JobStatus {
            job_id: job_id.to_string(),
            status,
            progress: Some(if status == ProcessingStatus::Completed { 100 } else { 50 }),
            error: None,
        })
    }
}

#[async_trait]
impl AttemptRecorder for FakeBackend {
    async fn record_attempt(&self, attempt: &QuizAttempt) -> Result<(), ApiError> {
        if self.fail_recording.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: reqwest::StatusCode::BAD_GATEWAY,
                message: "upstream unavailable".into(),
            });
        }
        self.attempts.lock().unwrap().push(attempt.clone());
        Ok(())
    }
}
