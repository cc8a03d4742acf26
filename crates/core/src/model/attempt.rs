use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::grade::{Grade, percentage};
use crate::model::ids::MaterialId;
use crate::model::quiz::QuizQuestion;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("score ({score}) exceeds question count ({total})")]
    ScoreAboveTotal { score: usize, total: usize },

    #[error("answer count ({answers}) does not match question count ({total})")]
    AnswerCountMismatch { answers: usize, total: usize },
}

/// Outcome of a submitted quiz: what the surrounding page forwards to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    score: usize,
    total_questions: usize,
    answers: Vec<Option<usize>>,
}

impl QuizResult {
    /// Score a set of answers against their questions.
    ///
    /// Slots beyond `answers.len()` count as unanswered. The denominator is always
    /// the full question count.
    #[must_use]
    pub fn grade(questions: &[QuizQuestion], answers: &[Option<usize>]) -> Self {
        let slots: Vec<Option<usize>> = (0..questions.len())
            .map(|index| answers.get(index).copied().flatten())
            .collect();
        let score = questions
            .iter()
            .zip(&slots)
            .filter(|(question, chosen)| question.is_correct(**chosen))
            .count();

        Self {
            score,
            total_questions: questions.len(),
            answers: slots,
        }
    }

    /// Rehydrate a result from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` if the counts are inconsistent.
    pub fn from_persisted(
        score: usize,
        total_questions: usize,
        answers: Vec<Option<usize>>,
    ) -> Result<Self, AttemptError> {
        if score > total_questions {
            return Err(AttemptError::ScoreAboveTotal {
                score,
                total: total_questions,
            });
        }
        if answers.len() != total_questions {
            return Err(AttemptError::AnswerCountMismatch {
                answers: answers.len(),
                total: total_questions,
            });
        }
        Ok(Self {
            score,
            total_questions,
            answers,
        })
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn incorrect(&self) -> usize {
        self.total_questions - self.score
    }

    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.answers.iter().filter(|a| a.is_none()).count()
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        percentage(self.score as u64, self.total_questions as u64)
    }

    #[must_use]
    pub fn grade_band(&self) -> Grade {
        Grade::from_percentage(self.percentage())
    }
}

/// A quiz result attributed to a material, as kept in local history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttempt {
    material_id: MaterialId,
    result: QuizResult,
    completed_at: DateTime<Utc>,
}

impl QuizAttempt {
    #[must_use]
    pub fn new(material_id: MaterialId, result: QuizResult, completed_at: DateTime<Utc>) -> Self {
        Self {
            material_id,
            result,
            completed_at,
        }
    }

    #[must_use]
    pub fn material_id(&self) -> &MaterialId {
        &self.material_id
    }

    #[must_use]
    pub fn result(&self) -> &QuizResult {
        &self.result
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: usize) -> QuizQuestion {
        QuizQuestion::new(
            "Q",
            vec!["a".into(), "b".into(), "c".into()],
            correct,
            None,
        )
        .unwrap()
    }

    #[test]
    fn grades_two_of_three() {
        let questions = vec![question(1), question(0), question(2)];
        let result = QuizResult::grade(&questions, &[Some(1), Some(0), Some(1)]);

        assert_eq!(result.score(), 2);
        assert_eq!(result.total_questions(), 3);
        assert_eq!(result.percentage(), 67);
        assert_eq!(result.grade_band(), Grade::D);
        assert_eq!(result.incorrect(), 1);
    }

    #[test]
    fn unanswered_counts_against_the_score() {
        let questions = vec![question(0), question(0)];
        let result = QuizResult::grade(&questions, &[Some(0), None]);

        assert_eq!(result.score(), 1);
        assert_eq!(result.total_questions(), 2);
        assert_eq!(result.unanswered(), 1);
        assert_eq!(result.percentage(), 50);
    }

    #[test]
    fn short_answer_list_is_padded() {
        let questions = vec![question(0), question(1)];
        let result = QuizResult::grade(&questions, &[Some(0)]);
        assert_eq!(result.answers(), &[Some(0), None]);
    }

    #[test]
    fn persisted_result_must_be_consistent() {
        assert_eq!(
            QuizResult::from_persisted(4, 3, vec![None; 3]).unwrap_err(),
            AttemptError::ScoreAboveTotal { score: 4, total: 3 }
        );
        assert_eq!(
            QuizResult::from_persisted(1, 3, vec![Some(0)]).unwrap_err(),
            AttemptError::AnswerCountMismatch {
                answers: 1,
                total: 3
            }
        );
        assert!(QuizResult::from_persisted(1, 2, vec![Some(0), None]).is_ok());
    }
}
