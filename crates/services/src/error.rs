//! Shared error types for the services crate.

use reqwest::StatusCode;
use thiserror::Error;

use study_core::model::{IdError, MaterialKind};
use study_core::session::SessionError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the backend HTTP client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not signed in or session expired")]
    Unauthorized,
    #[error("request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("backend rejected the request: {0}")]
    Rejected(String),
    #[error("backend returned no data")]
    EmptyResponse,
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<IdError> for ApiError {
    fn from(err: IdError) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}

/// Errors emitted by `AuthService` and `SessionTokenProvider`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `StudyService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StudyError {
    #[error("material is a {found}, expected a {expected}")]
    WrongKind {
        expected: MaterialKind,
        found: MaterialKind,
    },
    #[error("quiz has not been submitted")]
    NotSubmitted,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `LibraryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LibraryError {
    #[error("{0} materials cannot be saved")]
    NotSavable(MaterialKind),
    #[error("content is still processing")]
    ContentNotReady,
    #[error("{failed} of {requested} deletions failed")]
    PartialDelete { failed: usize, requested: usize },
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `UploadService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UploadError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("processing failed: {0}")]
    JobFailed(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
