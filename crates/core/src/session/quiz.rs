use crate::model::{QuizQuestion, QuizResult, percentage};

use super::SessionError;
use super::countdown::{Countdown, Tick};

/// Why a quiz ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitReason {
    Manual,
    Timeout,
}

/// One row of the post-submission review.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuestionReview<'a> {
    pub index: usize,
    pub question: &'a QuizQuestion,
    pub chosen: Option<usize>,
    pub is_correct: bool,
}

/// One pass over a quiz question set.
///
/// `answers` always has one slot per question. Once submitted the session is
/// terminal: answers are frozen and the countdown is stopped.
#[derive(Clone, Debug)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    position: usize,
    answers: Vec<Option<usize>>,
    countdown: Option<Countdown>,
    outcome: Option<(QuizResult, SubmitReason)>,
}

impl QuizSession {
    /// Start a quiz, optionally under a countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if there are no questions.
    pub fn new(
        questions: Vec<QuizQuestion>,
        countdown: Option<Countdown>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        let answers = vec![None; questions.len()];
        Ok(Self {
            questions,
            position: 0,
            answers,
            countdown,
            outcome: None,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false: empty quizzes are rejected at construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.position]
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, question: usize) -> Option<usize> {
        self.answers.get(question).copied().flatten()
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<usize> {
        self.answer(self.position)
    }

    #[must_use]
    pub fn is_answered(&self, question: usize) -> bool {
        self.answer(question).is_some()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.answers.len() - self.answered_count()
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.position == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.position + 1 == self.questions.len()
    }

    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        percentage(self.position as u64 + 1, self.questions.len() as u64)
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.outcome.as_ref().map(|(result, _)| result)
    }

    #[must_use]
    pub fn submitted_by(&self) -> Option<SubmitReason> {
        self.outcome.as_ref().map(|(_, reason)| *reason)
    }

    #[must_use]
    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.countdown.as_ref().map(Countdown::remaining)
    }

    /// True while a countdown exists and is still ticking.
    #[must_use]
    pub fn is_timed_and_running(&self) -> bool {
        self.countdown.as_ref().is_some_and(Countdown::is_running)
    }

    /// Choose `option` for `question`. Reselecting the same option is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submitted` once the quiz is over, or an out-of-range
    /// error for a bad index. State is left untouched on error.
    pub fn select_option(&mut self, question: usize, option: usize) -> Result<(), SessionError> {
        if self.is_submitted() {
            return Err(SessionError::Submitted);
        }
        let Some(q) = self.questions.get(question) else {
            return Err(SessionError::QuestionOutOfRange {
                index: question,
                len: self.questions.len(),
            });
        };
        if option >= q.option_count() {
            return Err(SessionError::OptionOutOfRange {
                index: option,
                len: q.option_count(),
            });
        }
        self.answers[question] = Some(option);
        Ok(())
    }

    /// `select_option` for the question under the cursor.
    ///
    /// # Errors
    ///
    /// Same as `select_option`.
    pub fn select_current(&mut self, option: usize) -> Result<(), SessionError> {
        self.select_option(self.position, option)
    }

    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.position += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.position -= 1;
        true
    }

    /// Move the cursor anywhere. Out-of-range targets are ignored.
    pub fn jump_to(&mut self, question: usize) -> bool {
        if question >= self.questions.len() {
            return false;
        }
        self.position = question;
        true
    }

    /// Advance the countdown by one second, submitting when it hits zero.
    ///
    /// Untimed or already submitted sessions report `Tick::Stopped`.
    pub fn tick(&mut self) -> Tick {
        if self.is_submitted() {
            return Tick::Stopped;
        }
        let Some(countdown) = self.countdown.as_mut() else {
            return Tick::Stopped;
        };
        let tick = countdown.tick();
        if tick == Tick::Expired {
            self.finish(SubmitReason::Timeout);
        }
        tick
    }

    /// Score the quiz and freeze it. Calling again returns the first result.
    pub fn submit(&mut self) -> &QuizResult {
        self.finish(SubmitReason::Manual)
    }

    fn finish(&mut self, reason: SubmitReason) -> &QuizResult {
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.stop();
        }
        let (result, _) = self.outcome.get_or_insert_with(|| {
            let result = QuizResult::grade(&self.questions, &self.answers);
            (result, reason)
        });
        result
    }

    /// Per-question review, available once submitted.
    #[must_use]
    pub fn review(&self) -> Option<Vec<QuestionReview<'_>>> {
        self.result()?;
        Some(
            self.questions
                .iter()
                .zip(&self.answers)
                .enumerate()
                .map(|(index, (question, chosen))| QuestionReview {
                    index,
                    question,
                    chosen: *chosen,
                    is_correct: question.is_correct(*chosen),
                })
                .collect(),
        )
    }
}
