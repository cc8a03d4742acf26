use dioxus::prelude::*;
use services::{ApiError, AuthError, LibraryError, StudyError, UploadError};
use study_core::session::SessionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    SignedOut,
    InvalidCredentials,
    MissingInput,
    NotFound,
    EmptySession,
    WrongKind,
    ContentNotReady,
    ProcessingFailed,
    PartialDelete,
    SignOutIncomplete,
    Offline,
    Server,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::SignedOut => "Your session has expired. Please sign in again.",
            Self::InvalidCredentials => "Invalid email or password.",
            Self::MissingInput => "Please fill in every field.",
            Self::NotFound => "That item no longer exists.",
            Self::EmptySession => "This material has nothing to study yet.",
            Self::WrongKind => "This material cannot be opened here.",
            Self::ContentNotReady => "This content is still being processed.",
            Self::ProcessingFailed => "Processing failed. Try uploading again.",
            Self::PartialDelete => "Some materials could not be deleted.",
            Self::SignOutIncomplete => {
                "Signed out, but the saved sign-in could not be removed from this device."
            }
            Self::Offline => "Could not reach the server. Check your connection.",
            Self::Server => "The server could not complete the request.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }

    /// Auth failures on the login form mean bad credentials, not an expired session.
    #[must_use]
    pub fn from_login(err: &AuthError) -> Self {
        match err {
            AuthError::Api(ApiError::Unauthorized) => Self::InvalidCredentials,
            other => Self::from(other),
        }
    }

    /// A storage failure on logout leaves credentials behind for the next launch.
    #[must_use]
    pub fn from_logout(err: &AuthError) -> Self {
        match err {
            AuthError::Storage(_) => Self::SignOutIncomplete,
            other => Self::from(other),
        }
    }
}

impl From<&ApiError> for ViewError {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Unauthorized => Self::SignedOut,
            ApiError::Status { status, .. } if status.as_u16() == 404 => Self::NotFound,
            ApiError::Status { .. } | ApiError::Rejected(_) => Self::Server,
            ApiError::Http(_) => Self::Offline,
            _ => Self::Unknown,
        }
    }
}

impl From<&AuthError> for ViewError {
    fn from(err: &AuthError) -> Self {
        match err {
            AuthError::MissingField(_) => Self::MissingInput,
            AuthError::Api(api) => Self::from(api),
            _ => Self::Unknown,
        }
    }
}

impl From<&StudyError> for ViewError {
    fn from(err: &StudyError) -> Self {
        match err {
            StudyError::WrongKind { .. } => Self::WrongKind,
            StudyError::Session(SessionError::Empty) => Self::EmptySession,
            StudyError::Api(api) => Self::from(api),
            _ => Self::Unknown,
        }
    }
}

impl From<&LibraryError> for ViewError {
    fn from(err: &LibraryError) -> Self {
        match err {
            LibraryError::ContentNotReady => Self::ContentNotReady,
            LibraryError::PartialDelete { .. } => Self::PartialDelete,
            LibraryError::NotSavable(_) => Self::WrongKind,
            LibraryError::Api(api) => Self::from(api),
            _ => Self::Unknown,
        }
    }
}

impl From<&UploadError> for ViewError {
    fn from(err: &UploadError) -> Self {
        match err {
            UploadError::MissingField(_) => Self::MissingInput,
            UploadError::JobFailed(_) => Self::ProcessingFailed,
            UploadError::Api(api) => Self::from(api),
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
