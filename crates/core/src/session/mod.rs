//! In-memory study sessions: flashcard review and quizzes.
//!
//! Sessions are synchronous state machines. They never perform I/O; callers
//! feed them user events (and timer ticks) and read back derived state.

mod countdown;
mod flashcards;
mod quiz;

use thiserror::Error;

pub use countdown::{Countdown, Tick, format_clock};
pub use flashcards::{DeckCompletion, FlashcardSession};
pub use quiz::{QuestionReview, QuizSession, SubmitReason};

/// Rejected session inputs and transitions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("nothing to study: the set is empty")]
    Empty,

    #[error("quiz already submitted")]
    Submitted,

    #[error("question {index} is out of range (len {len})")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("option {index} is out of range (len {len})")]
    OptionOutOfRange { index: usize, len: usize },

    #[error("reveal the answer before marking the card")]
    NotRevealed,
}
