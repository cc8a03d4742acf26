use thiserror::Error;

use crate::model::{AttemptError, FlashcardError, IdError, QuizQuestionError};
use crate::session::SessionError;

/// Any domain-level failure, for callers that do not care which layer rejected input.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Id(#[from] IdError),
    #[error(transparent)]
    Flashcard(#[from] FlashcardError),
    #[error(transparent)]
    QuizQuestion(#[from] QuizQuestionError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
