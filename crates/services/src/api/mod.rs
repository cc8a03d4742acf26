//! Backend REST API: the traits services depend on, and the `reqwest` client
//! that implements them.

use std::path::PathBuf;

use async_trait::async_trait;
use study_core::model::{
    Content, ContentId, Credentials, JobStatus, MaterialData, MaterialId, MaterialKind,
    QuizAttempt, StudyMaterial,
};

use crate::error::ApiError;
use crate::library::{MaterialQuery, MaterialStats};

mod client;
mod dto;

pub use client::{ApiClient, ApiConfig, DEFAULT_API_URL};
pub use reqwest::StatusCode;

/// One page of materials plus the server's paging info.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterialPage {
    pub materials: Vec<StudyMaterial>,
    pub pagination: Pagination,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub total_pages: u32,
}

/// Partial update for `PUT /study-materials/{id}`. `None` leaves a field alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterialUpdate {
    pub title: Option<String>,
    /// Empty string removes the material from its folder.
    pub folder: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Parameters for generating a preview.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateRequest {
    pub title: String,
    /// Number of cards or questions; ignored for summaries and concepts.
    pub count: Option<u32>,
}

/// A generated (and possibly edited) payload about to be saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterialDraft {
    pub title: String,
    pub tags: Vec<String>,
    pub folder: Option<String>,
    pub data: MaterialData,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadSource {
    Url { url: String, title: String },
    Youtube { url: String, title: String },
    Pdf { path: PathBuf, title: String },
}

impl UploadSource {
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Url { title, .. } | Self::Youtube { title, .. } | Self::Pdf { title, .. } => {
                title
            }
        }
    }
}

/// What an upload hands back: the content record, a job to poll, or both.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadReceipt {
    pub content: Option<Content>,
    pub job_id: Option<String>,
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or is rejected.
    async fn login(&self, email: &str, password: &str) -> Result<Credentials, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or is rejected.
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Credentials, ApiError>;
}

#[async_trait]
pub trait MaterialApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the payload is malformed.
    async fn list_materials(&self, query: &MaterialQuery) -> Result<MaterialPage, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the payload is malformed.
    async fn get_material(&self, id: &MaterialId) -> Result<StudyMaterial, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the payload is malformed.
    async fn update_material(
        &self,
        id: &MaterialId,
        update: &MaterialUpdate,
    ) -> Result<StudyMaterial, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn delete_material(&self, id: &MaterialId) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn folders(&self) -> Result<Vec<String>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn tags(&self) -> Result<Vec<String>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn stats(&self) -> Result<MaterialStats, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if generation fails or the preview is malformed.
    async fn generate(
        &self,
        content_id: &ContentId,
        kind: MaterialKind,
        request: &GenerateRequest,
    ) -> Result<MaterialData, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the kind cannot be saved.
    async fn save_generated(
        &self,
        content_id: &ContentId,
        draft: &MaterialDraft,
    ) -> Result<StudyMaterial, ApiError>;
}

#[async_trait]
pub trait ContentApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the payload is malformed.
    async fn list_contents(&self) -> Result<Vec<Content>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the payload is malformed.
    async fn get_content(&self, id: &ContentId) -> Result<Content, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn delete_content(&self, id: &ContentId) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the file cannot be read or the request fails.
    async fn upload(&self, source: &UploadSource) -> Result<UploadReceipt, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn job_status(&self, job_id: &str) -> Result<JobStatus, ApiError>;
}

/// Forwards a finished quiz to wherever attempts are tracked remotely.
#[async_trait]
pub trait AttemptRecorder: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` if the attempt cannot be delivered.
    async fn record_attempt(&self, attempt: &QuizAttempt) -> Result<(), ApiError>;
}
