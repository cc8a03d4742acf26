//! Wire shapes for the backend. Everything is validated on the way in through
//! the domain constructors; nothing here leaves this module unconverted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use study_core::model::{
    AccessToken, Concept, Content, ContentId, ContentKind, Credentials, Flashcard, JobStatus,
    MaterialData, MaterialId, MaterialKind, ProcessingStatus, QuizAttempt, QuizQuestion,
    StudyMaterial, SummaryType, User, UserId,
};

use tracing::warn;

use super::{MaterialDraft, MaterialPage, MaterialUpdate, Pagination, UploadReceipt};
use crate::error::ApiError;
use crate::library::MaterialStats;

fn invalid<E: std::fmt::Display>(e: E) -> ApiError {
    ApiError::InvalidPayload(e.to_string())
}

//
// ─── ENVELOPE ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}

//
// ─── AUTH ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
pub(crate) struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterBody<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDto {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    email: String,
    #[serde(default)]
    name: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserDto> for User {
    type Error = ApiError;

    fn try_from(dto: UserDto) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::new(dto.id)?,
            email: dto.email,
            name: dto.name,
            created_at: dto.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthPayload {
    user: UserDto,
    access_token: String,
}

impl TryFrom<AuthPayload> for Credentials {
    type Error = ApiError;

    fn try_from(payload: AuthPayload) -> Result<Self, Self::Error> {
        if payload.access_token.trim().is_empty() {
            return Err(ApiError::InvalidPayload("empty access token".into()));
        }
        Ok(Credentials {
            access_token: AccessToken::new(payload.access_token),
            user: payload.user.try_into()?,
        })
    }
}

//
// ─── CONTENT ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContentDto {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    title: String,
    #[serde(rename = "type")]
    kind: ContentKind,
    status: ProcessingStatus,
    #[serde(default)]
    source_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ContentDto> for Content {
    type Error = ApiError;

    fn try_from(dto: ContentDto) -> Result<Self, Self::Error> {
        Ok(Content {
            id: ContentId::new(dto.id)?,
            title: dto.title,
            kind: dto.kind,
            status: dto.status,
            source_url: dto.source_url.filter(|u| !u.trim().is_empty()),
            created_at: dto.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentsPayload {
    #[serde(default)]
    pub contents: Vec<ContentDto>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadLinkBody<'a> {
    pub url: &'a str,
    pub title: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadPayload {
    #[serde(default)]
    content: Option<ContentDto>,
    #[serde(default)]
    job_id: Option<String>,
}

impl TryFrom<UploadPayload> for UploadReceipt {
    type Error = ApiError;

    fn try_from(payload: UploadPayload) -> Result<Self, Self::Error> {
        Ok(UploadReceipt {
            content: payload.content.map(Content::try_from).transpose()?,
            job_id: payload.job_id.filter(|id| !id.trim().is_empty()),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobStatusDto {
    #[serde(default)]
    job_id: Option<String>,
    status: ProcessingStatus,
    #[serde(default)]
    progress: Option<u8>,
    #[serde(default)]
    error: Option<String>,
}

impl JobStatusDto {
    pub(crate) fn into_status(self, requested: &str) -> JobStatus {
        JobStatus {
            job_id: self.job_id.unwrap_or_else(|| requested.to_string()),
            status: self.status,
            progress: self.progress.map(|p| p.min(100)),
            error: self.error,
        }
    }
}

//
// ─── MATERIALS ─────────────────────────────────────────────────────────────────
//

/// `contentId` arrives either as a bare id or populated with the content document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentRef {
    Id(String),
    Populated {
        #[serde(rename = "_id", alias = "id")]
        id: String,
    },
}

impl ContentRef {
    fn into_id(self) -> String {
        match self {
            Self::Id(id) | Self::Populated { id } => id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FlashcardDto {
    question: String,
    answer: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionDto {
    question: String,
    options: Vec<String>,
    correct_answer: usize,
    #[serde(default)]
    explanation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KeyConceptDto {
    Text(String),
    Term { term: String, definition: String },
}

impl KeyConceptDto {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Term { term, definition } => format!("{term}: {definition}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConceptDto {
    #[serde(alias = "term", alias = "concept")]
    name: String,
    #[serde(default, alias = "definition", alias = "explanation")]
    description: String,
}

/// Loose union of every payload field; `into_data` picks the ones `kind` needs.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MaterialDataDto {
    #[serde(default)]
    flashcards: Vec<FlashcardDto>,
    #[serde(default, alias = "quiz")]
    questions: Vec<QuestionDto>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    summary_type: SummaryType,
    #[serde(default)]
    key_concepts: Vec<KeyConceptDto>,
    #[serde(default)]
    concepts: Vec<ConceptDto>,
}

impl MaterialDataDto {
    pub(crate) fn into_data(self, kind: MaterialKind) -> Result<MaterialData, ApiError> {
        match kind {
            MaterialKind::Flashcard => self
                .flashcards
                .into_iter()
                .map(|card| Flashcard::new(card.question, card.answer).map_err(invalid))
                .collect::<Result<Vec<_>, _>>()
                .map(MaterialData::Flashcards),
            MaterialKind::Quiz => self
                .questions
                .into_iter()
                .map(|q| {
                    QuizQuestion::new(q.question, q.options, q.correct_answer, q.explanation)
                        .map_err(invalid)
                })
                .collect::<Result<Vec<_>, _>>()
                .map(MaterialData::Quiz),
            MaterialKind::Summary => {
                let text = self
                    .summary
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| ApiError::InvalidPayload("summary text missing".into()))?;
                Ok(MaterialData::Summary {
                    text,
                    summary_type: self.summary_type,
                    key_concepts: self
                        .key_concepts
                        .into_iter()
                        .map(KeyConceptDto::into_text)
                        .collect(),
                })
            }
            MaterialKind::Concepts => Ok(MaterialData::Concepts(
                self.concepts
                    .into_iter()
                    .map(|c| Concept {
                        name: c.name,
                        description: c.description,
                    })
                    .collect(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MaterialDto {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    content_id: ContentRef,
    title: String,
    #[serde(rename = "type")]
    kind: MaterialKind,
    #[serde(default)]
    data: MaterialDataDto,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    folder: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<MaterialDto> for StudyMaterial {
    type Error = ApiError;

    fn try_from(dto: MaterialDto) -> Result<Self, Self::Error> {
        Ok(StudyMaterial {
            id: MaterialId::new(dto.id)?,
            content_id: ContentId::new(dto.content_id.into_id())?,
            title: dto.title,
            folder: dto.folder.filter(|f| !f.trim().is_empty()),
            tags: dto.tags,
            created_at: dto.created_at,
            data: dto.data.into_data(dto.kind)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaginationDto {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    limit: u32,
    #[serde(default, alias = "totalItems")]
    total: u32,
    #[serde(default)]
    total_pages: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MaterialsPayload {
    #[serde(default)]
    materials: Vec<MaterialDto>,
    #[serde(default)]
    pagination: PaginationDto,
}

impl TryFrom<MaterialsPayload> for MaterialPage {
    type Error = ApiError;

    /// One malformed record is skipped, not allowed to fail the whole page.
    fn try_from(payload: MaterialsPayload) -> Result<Self, Self::Error> {
        let materials = payload
            .materials
            .into_iter()
            .filter_map(|dto| {
                let id = dto.id.clone();
                StudyMaterial::try_from(dto)
                    .inspect_err(|err| warn!(material = %id, error = %err, "skipping material"))
                    .ok()
            })
            .collect();
        let p = payload.pagination;
        Ok(MaterialPage {
            materials,
            pagination: Pagination {
                page: p.page,
                limit: p.limit,
                total: p.total,
                total_pages: p.total_pages,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FoldersPayload {
    #[serde(default)]
    pub folders: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagsPayload {
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatsPayload {
    #[serde(default)]
    total: usize,
    #[serde(default)]
    by_type: BTreeMap<String, usize>,
}

impl From<StatsPayload> for MaterialStats {
    fn from(payload: StatsPayload) -> Self {
        // Unknown type keys are dropped.
        let by_kind = payload
            .by_type
            .into_iter()
            .filter_map(|(key, count)| MaterialKind::parse(&key).map(|kind| (kind, count)))
            .collect();
        MaterialStats {
            total: payload.total,
            by_kind,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateBody<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct UpdateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    folder: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a [String]>,
}

impl<'a> From<&'a MaterialUpdate> for UpdateBody<'a> {
    fn from(update: &'a MaterialUpdate) -> Self {
        Self {
            title: update.title.as_deref(),
            folder: update.folder.as_deref(),
            tags: update.tags.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct FlashcardBody<'a> {
    question: &'a str,
    answer: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionBody<'a> {
    question: &'a str,
    options: &'a [String],
    correct_answer: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum SavePayload<'a> {
    Flashcards {
        flashcards: Vec<FlashcardBody<'a>>,
    },
    Quiz {
        questions: Vec<QuestionBody<'a>>,
    },
    Summary {
        summary: &'a str,
        #[serde(rename = "summaryType")]
        summary_type: SummaryType,
        #[serde(rename = "keyConcepts")]
        key_concepts: &'a [String],
    },
}

#[derive(Debug, Serialize)]
pub(crate) struct SaveBody<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    folder: Option<&'a str>,
    #[serde(flatten)]
    payload: SavePayload<'a>,
}

impl<'a> SaveBody<'a> {
    /// Path segment and body for `POST /study-materials/{contentId}/{segment}/save`.
    pub(crate) fn from_draft(draft: &'a MaterialDraft) -> Result<(&'static str, Self), ApiError> {
        let (segment, payload) = match &draft.data {
            MaterialData::Flashcards(cards) => (
                "flashcards",
                SavePayload::Flashcards {
                    flashcards: cards
                        .iter()
                        .map(|c| FlashcardBody {
                            question: c.question(),
                            answer: c.answer(),
                        })
                        .collect(),
                },
            ),
            MaterialData::Quiz(questions) => (
                "quiz",
                SavePayload::Quiz {
                    questions: questions
                        .iter()
                        .map(|q| QuestionBody {
                            question: q.question(),
                            options: q.options(),
                            correct_answer: q.correct_answer(),
                            explanation: q.explanation(),
                        })
                        .collect(),
                },
            ),
            MaterialData::Summary {
                text,
                summary_type,
                key_concepts,
            } => (
                "summary",
                SavePayload::Summary {
                    summary: text,
                    summary_type: *summary_type,
                    key_concepts,
                },
            ),
            MaterialData::Concepts(_) => {
                return Err(ApiError::InvalidRequest(
                    "concept lists cannot be saved".into(),
                ));
            }
        };
        Ok((
            segment,
            Self {
                title: &draft.title,
                tags: &draft.tags,
                folder: draft.folder.as_deref(),
                payload,
            },
        ))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AttemptBody<'a> {
    score: usize,
    total_questions: usize,
    answers: &'a [Option<usize>],
}

impl<'a> From<&'a QuizAttempt> for AttemptBody<'a> {
    fn from(attempt: &'a QuizAttempt) -> Self {
        let result = attempt.result();
        Self {
            score: result.score(),
            total_questions: result.total_questions(),
            answers: result.answers(),
        }
    }
}
