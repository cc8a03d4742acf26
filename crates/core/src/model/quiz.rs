use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizQuestionError {
    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("a question needs at least 2 options, got {len}")]
    TooFewOptions { len: usize },

    #[error("correct answer {index} is outside the {len} options")]
    CorrectAnswerOutOfRange { index: usize, len: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: usize,
    explanation: Option<String>,
}

impl QuizQuestion {
    /// Build a validated question.
    ///
    /// Blank explanations are normalized to `None`.
    ///
    /// # Errors
    ///
    /// Returns `QuizQuestionError` if the text is blank, fewer than two options
    /// are given, or `correct_answer` does not index into `options`.
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
        explanation: Option<String>,
    ) -> Result<Self, QuizQuestionError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(QuizQuestionError::EmptyQuestion);
        }
        if options.len() < 2 {
            return Err(QuizQuestionError::TooFewOptions { len: options.len() });
        }
        if correct_answer >= options.len() {
            return Err(QuizQuestionError::CorrectAnswerOutOfRange {
                index: correct_answer,
                len: options.len(),
            });
        }
        let explanation = explanation.filter(|text| !text.trim().is_empty());

        Ok(Self {
            question,
            options,
            correct_answer,
            explanation,
        })
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Strict equality against the correct index; unanswered never matches.
    #[must_use]
    pub fn is_correct(&self, chosen: Option<usize>) -> bool {
        chosen == Some(self.correct_answer)
    }
}

/// Letter label for an option position: 0 -> 'A', 1 -> 'B', ...
#[must_use]
pub fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|i| b'A'.checked_add(i))
        .filter(u8::is_ascii_uppercase)
        .map_or('?', char::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {i}")).collect()
    }

    #[test]
    fn rejects_single_option() {
        let err = QuizQuestion::new("Q", options(1), 0, None).unwrap_err();
        assert_eq!(err, QuizQuestionError::TooFewOptions { len: 1 });
    }

    #[test]
    fn rejects_correct_answer_out_of_range() {
        let err = QuizQuestion::new("Q", options(3), 3, None).unwrap_err();
        assert_eq!(
            err,
            QuizQuestionError::CorrectAnswerOutOfRange { index: 3, len: 3 }
        );
    }

    #[test]
    fn blank_explanation_becomes_none() {
        let q = QuizQuestion::new("Q", options(2), 1, Some("  ".into())).unwrap();
        assert_eq!(q.explanation(), None);
    }

    #[test]
    fn unanswered_is_never_correct() {
        let q = QuizQuestion::new("Q", options(2), 0, None).unwrap();
        assert!(q.is_correct(Some(0)));
        assert!(!q.is_correct(Some(1)));
        assert!(!q.is_correct(None));
    }

    #[test]
    fn labels_options_alphabetically() {
        assert_eq!(option_label(0), 'A');
        assert_eq!(option_label(3), 'D');
        assert_eq!(option_label(25), 'Z');
        assert_eq!(option_label(26), '?');
    }
}
