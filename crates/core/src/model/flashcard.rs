use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlashcardError {
    #[error("flashcard question cannot be empty")]
    EmptyQuestion,

    #[error("flashcard answer cannot be empty")]
    EmptyAnswer,
}

/// A question/answer pair. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    question: String,
    answer: String,
}

impl Flashcard {
    /// Build a flashcard from its two faces.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardError` if either face is blank.
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<Self, FlashcardError> {
        let question = question.into();
        let answer = answer.into();
        if question.trim().is_empty() {
            return Err(FlashcardError::EmptyQuestion);
        }
        if answer.trim().is_empty() {
            return Err(FlashcardError::EmptyAnswer);
        }
        Ok(Self { question, answer })
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }
}
