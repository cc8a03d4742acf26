use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use study_core::model::{
    Content, ContentId, Credentials, JobStatus, MaterialData, MaterialId, MaterialKind,
    QuizAttempt, StudyMaterial,
};
use tracing::{debug, info, warn};

use super::dto::{
    AttemptBody, AuthPayload, ContentDto, ContentsPayload, Envelope, ErrorBody, FoldersPayload,
    GenerateBody, JobStatusDto, LoginBody, MaterialDataDto, MaterialDto, MaterialsPayload,
    RegisterBody, SaveBody, StatsPayload, TagsPayload, UpdateBody, UploadLinkBody, UploadPayload,
};
use super::{
    AttemptRecorder, AuthApi, ContentApi, GenerateRequest, MaterialApi, MaterialDraft,
    MaterialPage, MaterialUpdate, UploadReceipt, UploadSource,
};
use crate::error::ApiError;
use crate::library::{MaterialQuery, MaterialStats};
use crate::token::SessionTokenProvider;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// `STUDY_API_URL` and `STUDY_API_TIMEOUT_SECS`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("STUDY_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| {
                info!("STUDY_API_URL not set, using default: {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_string()
            });
        let timeout = match env::var("STUDY_API_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().unwrap_or_else(|e| {
                warn!("Invalid STUDY_API_TIMEOUT_SECS value: {e}");
                DEFAULT_TIMEOUT_SECS
            }),
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        Self {
            base_url,
            timeout: Duration::from_secs(timeout),
        }
    }
}

/// `reqwest` client for the study backend. Attaches the current bearer token
/// to every request and unwraps the `{ success, data, message }` envelope.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
    tokens: Arc<SessionTokenProvider>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig, tokens: Arc<SessionTokenProvider>) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            tokens,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.get() {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        debug!(url = %response.url(), %status, "api response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            let message = body.message.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            return Err(ApiError::Status { status, message });
        }
        Ok(response)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        let envelope: Envelope<T> = response.json().await?;
        if !envelope.success {
            return Err(ApiError::Rejected(envelope.message.unwrap_or_default()));
        }
        envelope.data.ok_or(ApiError::EmptyResponse)
    }

    /// For endpoints whose `data` is irrelevant or absent.
    async fn send_unit(&self, request: RequestBuilder) -> Result<(), ApiError> {
        let response = self.execute(request).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(());
        }
        let envelope: Envelope<serde_json::Value> = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::InvalidPayload(e.to_string()))?;
        if !envelope.success {
            return Err(ApiError::Rejected(envelope.message.unwrap_or_default()));
        }
        Ok(())
    }

    async fn pdf_form(path: &std::path::Path, title: &str) -> Result<Form, ApiError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload.pdf".to_string(), |n| n.to_string_lossy().into_owned());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        Ok(Form::new().part("file", part).text("title", title.to_string()))
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<Credentials, ApiError> {
        let request = self
            .client
            .post(self.url("auth/login"))
            .json(&LoginBody { email, password });
        let payload: AuthPayload = self.send(request).await?;
        payload.try_into()
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Credentials, ApiError> {
        let request = self
            .client
            .post(self.url("auth/register"))
            .json(&RegisterBody {
                name,
                email,
                password,
            });
        let payload: AuthPayload = self.send(request).await?;
        payload.try_into()
    }
}

#[async_trait]
impl MaterialApi for ApiClient {
    async fn list_materials(&self, query: &MaterialQuery) -> Result<MaterialPage, ApiError> {
        let request = self
            .client
            .get(self.url("study-materials"))
            .query(&query.to_query_pairs());
        let payload: MaterialsPayload = self.send(request).await?;
        payload.try_into()
    }

    async fn get_material(&self, id: &MaterialId) -> Result<StudyMaterial, ApiError> {
        let request = self
            .client
            .get(self.url(&format!("study-materials/{}", id.as_str())));
        let dto: MaterialDto = self.send(request).await?;
        dto.try_into()
    }

    async fn update_material(
        &self,
        id: &MaterialId,
        update: &MaterialUpdate,
    ) -> Result<StudyMaterial, ApiError> {
        let request = self
            .client
            .put(self.url(&format!("study-materials/{}", id.as_str())))
            .json(&UpdateBody::from(update));
        let dto: MaterialDto = self.send(request).await?;
        dto.try_into()
    }

    async fn delete_material(&self, id: &MaterialId) -> Result<(), ApiError> {
        let request = self
            .client
            .delete(self.url(&format!("study-materials/{}", id.as_str())));
        self.send_unit(request).await
    }

    async fn folders(&self) -> Result<Vec<String>, ApiError> {
        let request = self.client.get(self.url("study-materials/folders"));
        let payload: FoldersPayload = self.send(request).await?;
        Ok(payload.folders)
    }

    async fn tags(&self) -> Result<Vec<String>, ApiError> {
        let request = self.client.get(self.url("study-materials/tags"));
        let payload: TagsPayload = self.send(request).await?;
        Ok(payload.tags)
    }

    async fn stats(&self) -> Result<MaterialStats, ApiError> {
        let request = self.client.get(self.url("study-materials/stats"));
        let payload: StatsPayload = self.send(request).await?;
        Ok(payload.into())
    }

    async fn generate(
        &self,
        content_id: &ContentId,
        kind: MaterialKind,
        request: &GenerateRequest,
    ) -> Result<MaterialData, ApiError> {
        let segment = match kind {
            MaterialKind::Flashcard => "flashcards",
            MaterialKind::Quiz => "quiz",
            MaterialKind::Summary => "summary",
            MaterialKind::Concepts => "concepts",
        };
        let count = match kind {
            MaterialKind::Flashcard | MaterialKind::Quiz => request.count,
            MaterialKind::Summary | MaterialKind::Concepts => None,
        };
        let http = self
            .client
            .post(self.url(&format!(
                "study-materials/{}/{segment}",
                content_id.as_str()
            )))
            .json(&GenerateBody {
                title: &request.title,
                count,
            });
        info!(content = %content_id, %kind, "generating preview");
        let dto: MaterialDataDto = self.send(http).await?;
        dto.into_data(kind)
    }

    async fn save_generated(
        &self,
        content_id: &ContentId,
        draft: &MaterialDraft,
    ) -> Result<StudyMaterial, ApiError> {
        let (segment, body) = SaveBody::from_draft(draft)?;
        let request = self
            .client
            .post(self.url(&format!(
                "study-materials/{}/{segment}/save",
                content_id.as_str()
            )))
            .json(&body);
        let dto: MaterialDto = self.send(request).await?;
        dto.try_into()
    }
}

#[async_trait]
impl ContentApi for ApiClient {
    async fn list_contents(&self) -> Result<Vec<Content>, ApiError> {
        let request = self.client.get(self.url("content"));
        let payload: ContentsPayload = self.send(request).await?;
        payload
            .contents
            .into_iter()
            .map(Content::try_from)
            .collect()
    }

    async fn get_content(&self, id: &ContentId) -> Result<Content, ApiError> {
        let request = self
            .client
            .get(self.url(&format!("content/{}", id.as_str())));
        let dto: ContentDto = self.send(request).await?;
        dto.try_into()
    }

    async fn delete_content(&self, id: &ContentId) -> Result<(), ApiError> {
        let request = self
            .client
            .delete(self.url(&format!("content/{}", id.as_str())));
        self.send_unit(request).await
    }

    async fn upload(&self, source: &UploadSource) -> Result<UploadReceipt, ApiError> {
        let request = match source {
            UploadSource::Url { url, title } => self
                .client
                .post(self.url("content/url"))
                .json(&UploadLinkBody { url, title }),
            UploadSource::Youtube { url, title } => self
                .client
                .post(self.url("content/youtube"))
                .json(&UploadLinkBody { url, title }),
            UploadSource::Pdf { path, title } => self
                .client
                .post(self.url("content/pdf"))
                .multipart(Self::pdf_form(path, title).await?),
        };
        let payload: UploadPayload = self.send(request).await?;
        payload.try_into()
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatus, ApiError> {
        let request = self.client.get(self.url(&format!("content/job/{job_id}")));
        let dto: JobStatusDto = self.send(request).await?;
        Ok(dto.into_status(job_id))
    }
}

#[async_trait]
impl AttemptRecorder for ApiClient {
    async fn record_attempt(&self, attempt: &QuizAttempt) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.url(&format!(
                "study-materials/{}/attempts",
                attempt.material_id().as_str()
            )))
            .json(&AttemptBody::from(attempt));
        self.send_unit(request).await
    }
}
