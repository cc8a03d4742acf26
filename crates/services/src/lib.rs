#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod auth_service;
pub mod error;
pub mod library;
pub mod quiz_timer;
pub mod study_service;
pub mod token;
pub mod upload_service;

#[cfg(test)]
mod test_support;

pub use study_core::Clock;

pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use error::{ApiError, AppServicesError, AuthError, LibraryError, StudyError, UploadError};
pub use library::{ContentQuery, LibraryService, MaterialQuery, MaterialStats};
pub use quiz_timer::{QuizTimer, TimerExit};
pub use study_service::{RecordedAttempt, StudyService};
pub use token::SessionTokenProvider;
pub use upload_service::UploadService;
