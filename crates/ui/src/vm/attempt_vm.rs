use storage::repository::AttemptRow;

use crate::vm::time_fmt::format_datetime;

/// One line of local quiz history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptCardVm {
    pub id: i64,
    pub material_id: String,
    pub score_label: String,
    pub percentage: u8,
    pub grade: &'static str,
    pub completed_at_str: String,
}

impl From<&AttemptRow> for AttemptCardVm {
    fn from(row: &AttemptRow) -> Self {
        let result = row.attempt.result();
        Self {
            id: row.id,
            material_id: row.attempt.material_id().as_str().to_string(),
            score_label: format!("{} / {}", result.score(), result.total_questions()),
            percentage: result.percentage(),
            grade: result.grade_band().letter(),
            completed_at_str: format_datetime(row.attempt.completed_at()),
        }
    }
}

#[must_use]
pub fn map_attempt_cards(rows: &[AttemptRow]) -> Vec<AttemptCardVm> {
    rows.iter().map(AttemptCardVm::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::{MaterialId, QuizAttempt, QuizQuestion, QuizResult};
    use study_core::time::fixed_now;

    #[test]
    fn card_shows_score_and_grade() {
        let questions = vec![
            QuizQuestion::new("Q1", vec!["a".into(), "b".into()], 0, None).unwrap(),
            QuizQuestion::new("Q2", vec!["a".into(), "b".into()], 1, None).unwrap(),
        ];
        let result = QuizResult::grade(&questions, &[Some(0), Some(1)]);
        let attempt = QuizAttempt::new(MaterialId::new("quiz-1").unwrap(), result, fixed_now());

        let card = AttemptCardVm::from(&AttemptRow::new(7, attempt));

        assert_eq!(card.id, 7);
        assert_eq!(card.material_id, "quiz-1");
        assert_eq!(card.score_label, "2 / 2");
        assert_eq!(card.percentage, 100);
        assert_eq!(card.grade, "A");
        assert_eq!(card.completed_at_str, "Nov 14, 2023 22:13");
    }
}
