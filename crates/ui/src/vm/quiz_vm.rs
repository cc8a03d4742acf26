use study_core::model::{QuizResult, option_label};
use study_core::session::{QuizSession, SessionError, SubmitReason, Tick, format_clock};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select(usize),
    Next,
    Previous,
    Jump(usize),
    Submit,
    ToggleExplanations,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub label: char,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub position_label: String,
    pub answered_label: String,
    pub text: String,
    pub options: Vec<OptionVm>,
    pub progress_percent: u8,
    pub can_go_back: bool,
    pub is_last: bool,
}

/// One button in the question navigator strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavDotVm {
    pub index: usize,
    pub answered: bool,
    pub current: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRowVm {
    pub number: usize,
    pub question: String,
    pub chosen: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizResultsVm {
    pub percentage: u8,
    pub grade: &'static str,
    pub headline: &'static str,
    pub score_label: String,
    pub correct: usize,
    pub wrong: usize,
    pub unanswered: usize,
    pub timed_out: bool,
    pub rows: Vec<ReviewRowVm>,
}

#[derive(Clone, Debug)]
pub struct QuizVm {
    title: String,
    session: QuizSession,
    show_explanations: bool,
}

impl QuizVm {
    #[must_use]
    pub fn new(title: impl Into<String>, session: QuizSession) -> Self {
        Self {
            title: title.into(),
            session,
            show_explanations: true,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.session.is_submitted()
    }

    #[must_use]
    pub fn show_explanations(&self) -> bool {
        self.show_explanations
    }

    /// Apply one user intent. Returns the result when this intent is the one
    /// that submitted the quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submitted` for a selection after submission, or
    /// an out-of-range error for a bad option.
    pub fn apply(&mut self, intent: QuizIntent) -> Result<Option<QuizResult>, SessionError> {
        match intent {
            QuizIntent::Select(option) => self.session.select_current(option)?,
            QuizIntent::Next => {
                self.session.next();
            }
            QuizIntent::Previous => {
                self.session.previous();
            }
            QuizIntent::Jump(question) => {
                self.session.jump_to(question);
            }
            QuizIntent::Submit => {
                if self.session.is_submitted() {
                    return Ok(None);
                }
                return Ok(Some(self.session.submit().clone()));
            }
            QuizIntent::ToggleExplanations => self.show_explanations = !self.show_explanations,
        }
        Ok(None)
    }

    pub fn tick(&mut self) -> Tick {
        self.session.tick()
    }

    #[must_use]
    pub fn question(&self) -> QuestionVm {
        let session = &self.session;
        let question = session.current_question();
        let chosen = session.current_answer();
        QuestionVm {
            position_label: format!("Question {} of {}", session.position() + 1, session.len()),
            answered_label: format!("{} of {} answered", session.answered_count(), session.len()),
            text: question.question().to_string(),
            options: question
                .options()
                .iter()
                .enumerate()
                .map(|(index, text)| OptionVm {
                    index,
                    label: option_label(index),
                    text: text.clone(),
                    selected: chosen == Some(index),
                })
                .collect(),
            progress_percent: session.progress_percent(),
            can_go_back: !session.is_first(),
            is_last: session.is_last(),
        }
    }

    #[must_use]
    pub fn nav_dots(&self) -> Vec<NavDotVm> {
        (0..self.session.len())
            .map(|index| NavDotVm {
                index,
                answered: self.session.is_answered(index),
                current: index == self.session.position(),
            })
            .collect()
    }

    /// `m:ss` while a countdown is attached.
    #[must_use]
    pub fn timer_label(&self) -> Option<String> {
        self.session.remaining_seconds().map(format_clock)
    }

    #[must_use]
    pub fn timer_is_low(&self) -> bool {
        self.session.countdown().is_some_and(|c| c.is_low())
    }

    /// Shown next to the submit button while questions are still open.
    #[must_use]
    pub fn unanswered_warning(&self) -> Option<String> {
        match self.session.unanswered_count() {
            0 => None,
            1 => Some("1 question is still unanswered.".to_string()),
            n => Some(format!("{n} questions are still unanswered.")),
        }
    }

    #[must_use]
    pub fn results(&self) -> Option<QuizResultsVm> {
        let result = self.session.result()?;
        let rows = self
            .session
            .review()?
            .into_iter()
            .map(|row| {
                let question = row.question;
                let option_text = |index: usize| {
                    question
                        .option(index)
                        .map(|text| format!("{}. {text}", option_label(index)))
                };
                ReviewRowVm {
                    number: row.index + 1,
                    question: question.question().to_string(),
                    chosen: row.chosen.and_then(option_text),
                    correct_answer: option_text(question.correct_answer()).unwrap_or_default(),
                    is_correct: row.is_correct,
                    explanation: question.explanation().map(str::to_string),
                }
            })
            .collect();
        let grade = result.grade_band();

        Some(QuizResultsVm {
            percentage: result.percentage(),
            grade: grade.letter(),
            headline: grade.headline(),
            score_label: format!("{} out of {} correct", result.score(), result.total_questions()),
            correct: result.score(),
            wrong: result.incorrect() - result.unanswered(),
            unanswered: result.unanswered(),
            timed_out: self.session.submitted_by() == Some(SubmitReason::Timeout),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::QuizQuestion;
    use study_core::session::Countdown;

    fn vm(minutes: u32) -> QuizVm {
        let options = || vec!["red".to_string(), "green".to_string(), "blue".to_string()];
        let questions = vec![
            QuizQuestion::new("Sky?", options(), 2, Some("Rayleigh scattering".into())).unwrap(),
            QuizQuestion::new("Grass?", options(), 1, None).unwrap(),
            QuizQuestion::new("Blood?", options(), 0, None).unwrap(),
        ];
        let session = QuizSession::new(questions, Countdown::from_minutes(minutes)).unwrap();
        QuizVm::new("Colours", session)
    }

    #[test]
    fn question_view_tracks_selection() {
        let mut vm = vm(0);
        vm.apply(QuizIntent::Select(2)).unwrap();

        let q = vm.question();
        assert_eq!(q.position_label, "Question 1 of 3");
        assert_eq!(q.answered_label, "1 of 3 answered");
        assert_eq!(q.options[2].label, 'C');
        assert!(q.options[2].selected);
        assert!(!q.options[0].selected);
        assert!(vm.timer_label().is_none());
    }

    #[test]
    fn navigator_marks_answered_and_current() {
        let mut vm = vm(0);
        vm.apply(QuizIntent::Select(0)).unwrap();
        vm.apply(QuizIntent::Jump(2)).unwrap();
        vm.apply(QuizIntent::Jump(7)).unwrap();

        let dots = vm.nav_dots();
        assert!(dots[0].answered && !dots[0].current);
        assert!(!dots[2].answered && dots[2].current);
        assert_eq!(vm.unanswered_warning().as_deref(), Some("2 questions are still unanswered."));
    }

    #[test]
    fn submit_returns_result_once() {
        let mut vm = vm(0);
        vm.apply(QuizIntent::Select(2)).unwrap();
        vm.apply(QuizIntent::Next).unwrap();
        vm.apply(QuizIntent::Select(0)).unwrap();

        let first = vm.apply(QuizIntent::Submit).unwrap().unwrap();
        assert_eq!(first.score(), 1);
        assert_eq!(vm.apply(QuizIntent::Submit).unwrap(), None);
        assert_eq!(vm.apply(QuizIntent::Select(1)), Err(SessionError::Submitted));

        let results = vm.results().unwrap();
        assert_eq!(results.percentage, 33);
        assert_eq!(results.grade, "F");
        assert_eq!(results.score_label, "1 out of 3 correct");
        assert_eq!((results.correct, results.wrong, results.unanswered), (1, 1, 1));
        assert_eq!(results.rows[0].explanation.as_deref(), Some("Rayleigh scattering"));
        assert_eq!(results.rows[1].chosen.as_deref(), Some("A. red"));
        assert_eq!(results.rows[1].correct_answer, "B. green");
        assert_eq!(results.rows[2].chosen, None);
        assert!(!results.timed_out);
    }

    #[test]
    fn timer_expiry_is_reported_as_timeout() {
        let mut vm = vm(1);
        assert_eq!(vm.timer_label().as_deref(), Some("1:00"));
        assert!(!vm.timer_is_low());

        vm.tick();
        assert_eq!(vm.timer_label().as_deref(), Some("0:59"));
        assert!(vm.timer_is_low());
        while vm.tick() != Tick::Expired {}

        assert!(vm.is_submitted());
        assert!(vm.results().unwrap().timed_out);
    }

    #[test]
    fn explanations_toggle() {
        let mut vm = vm(0);
        assert!(vm.show_explanations());
        vm.apply(QuizIntent::ToggleExplanations).unwrap();
        assert!(!vm.show_explanations());
    }
}
