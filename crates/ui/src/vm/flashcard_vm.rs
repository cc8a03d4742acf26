use study_core::session::{DeckCompletion, FlashcardSession, SessionError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlashcardIntent {
    Flip,
    Next,
    Previous,
    MarkKnown(bool),
    Shuffle,
    Restart,
}

/// What the card pane renders for the current position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlashcardFaceVm {
    pub position_label: String,
    pub known_label: String,
    pub face_label: &'static str,
    pub text: String,
    pub revealed: bool,
    pub is_known: bool,
    pub progress_percent: u8,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

#[derive(Clone, Debug)]
pub struct FlashcardVm {
    title: String,
    session: FlashcardSession,
}

impl FlashcardVm {
    #[must_use]
    pub fn new(title: impl Into<String>, session: FlashcardSession) -> Self {
        Self {
            title: title.into(),
            session,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn session(&self) -> &FlashcardSession {
        &self.session
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotRevealed` when marking a card whose answer is
    /// still hidden.
    pub fn apply(&mut self, intent: FlashcardIntent) -> Result<(), SessionError> {
        match intent {
            FlashcardIntent::Flip => self.session.flip(),
            FlashcardIntent::Next => {
                self.session.next();
            }
            FlashcardIntent::Previous => {
                self.session.previous();
            }
            FlashcardIntent::MarkKnown(known) => self.session.mark_known(known)?,
            FlashcardIntent::Shuffle => self.session.shuffle(),
            FlashcardIntent::Restart => self.session.reset(),
        }
        Ok(())
    }

    #[must_use]
    pub fn face(&self) -> FlashcardFaceVm {
        let session = &self.session;
        let total = session.len();
        FlashcardFaceVm {
            position_label: format!("Card {} of {total}", session.position() + 1),
            known_label: format!(
                "{} / {total} known ({}%)",
                session.known_count(),
                session.known_percent()
            ),
            face_label: if session.is_revealed() {
                "Answer"
            } else {
                "Question"
            },
            text: session.visible_face().to_string(),
            revealed: session.is_revealed(),
            is_known: session.is_current_known(),
            progress_percent: session.progress_percent(),
            can_go_back: !session.is_first(),
            can_go_forward: !session.is_last(),
        }
    }

    #[must_use]
    pub fn completion(&self) -> Option<DeckCompletion> {
        self.session.completion()
    }
}

#[must_use]
pub fn completion_message(completion: DeckCompletion) -> String {
    format!(
        "You know {} of {} cards ({}%).",
        completion.known, completion.total, completion.percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::Flashcard;

    fn vm() -> FlashcardVm {
        let cards = vec![
            Flashcard::new("Capital of France?", "Paris").unwrap(),
            Flashcard::new("2+2?", "4").unwrap(),
            Flashcard::new("H2O?", "Water").unwrap(),
        ];
        FlashcardVm::new("Basics", FlashcardSession::new(cards).unwrap())
    }

    #[test]
    fn first_card_shows_question() {
        let face = vm().face();
        assert_eq!(face.position_label, "Card 1 of 3");
        assert_eq!(face.face_label, "Question");
        assert_eq!(face.text, "Capital of France?");
        assert_eq!(face.known_label, "0 / 3 known (0%)");
        assert!(!face.can_go_back);
        assert!(face.can_go_forward);
    }

    #[test]
    fn marking_requires_flip_then_advances() {
        let mut vm = vm();
        assert_eq!(
            vm.apply(FlashcardIntent::MarkKnown(true)),
            Err(SessionError::NotRevealed)
        );

        vm.apply(FlashcardIntent::Flip).unwrap();
        assert_eq!(vm.face().text, "Paris");
        vm.apply(FlashcardIntent::MarkKnown(true)).unwrap();

        let face = vm.face();
        assert_eq!(face.position_label, "Card 2 of 3");
        assert_eq!(face.face_label, "Question");
        assert_eq!(face.known_label, "1 / 3 known (33%)");
    }

    #[test]
    fn completion_after_revealing_last_card() {
        let mut vm = vm();
        vm.apply(FlashcardIntent::Next).unwrap();
        vm.apply(FlashcardIntent::Next).unwrap();
        assert!(vm.completion().is_none());

        vm.apply(FlashcardIntent::Flip).unwrap();
        let done = vm.completion().unwrap();
        assert_eq!(completion_message(done), "You know 0 of 3 cards (0%).");

        vm.apply(FlashcardIntent::Restart).unwrap();
        assert_eq!(vm.face().position_label, "Card 1 of 3");
    }

    #[test]
    fn shuffle_from_completion_starts_a_new_pass() {
        let mut vm = vm();
        vm.apply(FlashcardIntent::Flip).unwrap();
        vm.apply(FlashcardIntent::MarkKnown(true)).unwrap();
        vm.apply(FlashcardIntent::Next).unwrap();
        vm.apply(FlashcardIntent::Flip).unwrap();
        assert!(vm.completion().is_some());

        vm.apply(FlashcardIntent::Shuffle).unwrap();

        assert!(vm.completion().is_none());
        let face = vm.face();
        assert_eq!(face.position_label, "Card 1 of 3");
        assert!(!face.revealed);
        assert_eq!(face.known_label, "1 / 3 known (33%)");
        assert_eq!(
            vm.apply(FlashcardIntent::MarkKnown(false)),
            Err(SessionError::NotRevealed)
        );
    }
}
