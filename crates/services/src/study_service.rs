use std::sync::Arc;

use storage::repository::{AttemptRepository, AttemptRow};
use study_core::Clock;
use study_core::model::{MaterialId, MaterialKind, QuizAttempt, QuizResult, StudyMaterial};
use study_core::session::{Countdown, FlashcardSession, QuizSession};
use tracing::{info, warn};

use crate::api::{AttemptRecorder, MaterialApi};
use crate::error::StudyError;

pub const DEFAULT_QUIZ_MINUTES: u32 = 30;

/// A submitted quiz after it has been written to local history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedAttempt {
    pub local_id: i64,
    pub attempt: QuizAttempt,
    /// Whether the backend accepted the attempt.
    pub forwarded: bool,
}

/// Opens study sessions over saved materials and records quiz outcomes.
#[derive(Clone)]
pub struct StudyService {
    clock: Clock,
    quiz_minutes: u32,
    materials: Arc<dyn MaterialApi>,
    attempts: Arc<dyn AttemptRepository>,
    recorder: Arc<dyn AttemptRecorder>,
}

impl StudyService {
    #[must_use]
    pub fn new(
        clock: Clock,
        materials: Arc<dyn MaterialApi>,
        attempts: Arc<dyn AttemptRepository>,
        recorder: Arc<dyn AttemptRecorder>,
    ) -> Self {
        Self {
            clock,
            quiz_minutes: DEFAULT_QUIZ_MINUTES,
            materials,
            attempts,
            recorder,
        }
    }

    /// Quiz time limit in whole minutes; zero disables the countdown.
    #[must_use]
    pub fn with_quiz_minutes(mut self, minutes: u32) -> Self {
        self.quiz_minutes = minutes;
        self
    }

    #[must_use]
    pub fn quiz_minutes(&self) -> u32 {
        self.quiz_minutes
    }

    async fn material_of_kind(
        &self,
        id: &MaterialId,
        expected: MaterialKind,
    ) -> Result<StudyMaterial, StudyError> {
        let material = self.materials.get_material(id).await?;
        let found = material.kind();
        if found != expected {
            return Err(StudyError::WrongKind { expected, found });
        }
        Ok(material)
    }

    /// # Errors
    ///
    /// Returns `StudyError::WrongKind` if the material is not a flashcard deck,
    /// `StudyError::Session` if the deck is empty, or `StudyError::Api` if the
    /// material cannot be fetched.
    pub async fn start_flashcards(
        &self,
        id: &MaterialId,
    ) -> Result<(StudyMaterial, FlashcardSession), StudyError> {
        let material = self.material_of_kind(id, MaterialKind::Flashcard).await?;
        let cards = material.flashcards().map(<[_]>::to_vec).unwrap_or_default();
        let session = FlashcardSession::new(cards)?;
        Ok((material, session))
    }

    /// # Errors
    ///
    /// Returns `StudyError::WrongKind` if the material is not a quiz,
    /// `StudyError::Session` if it has no questions, or `StudyError::Api` if
    /// the material cannot be fetched.
    pub async fn start_quiz(
        &self,
        id: &MaterialId,
    ) -> Result<(StudyMaterial, QuizSession), StudyError> {
        let material = self.material_of_kind(id, MaterialKind::Quiz).await?;
        let questions = material.questions().map(<[_]>::to_vec).unwrap_or_default();
        let session = QuizSession::new(questions, Countdown::from_minutes(self.quiz_minutes))?;
        Ok((material, session))
    }

    /// # Errors
    ///
    /// Returns `StudyError::WrongKind` if the material is not a summary, or
    /// `StudyError::Api` if it cannot be fetched.
    pub async fn open_summary(&self, id: &MaterialId) -> Result<StudyMaterial, StudyError> {
        self.material_of_kind(id, MaterialKind::Summary).await
    }

    /// Submit `session` (a no-op if already submitted) and record the result.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Storage` if the attempt cannot be written locally.
    pub async fn submit_quiz(
        &self,
        material_id: &MaterialId,
        session: &mut QuizSession,
    ) -> Result<RecordedAttempt, StudyError> {
        let result = session.submit().clone();
        self.record_result(material_id, &result).await
    }

    /// Write a submitted result to local history, then forward it to the
    /// backend. A forwarding failure is logged and reported through
    /// `RecordedAttempt::forwarded`, never as an error.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Storage` if the attempt cannot be written locally.
    pub async fn record_result(
        &self,
        material_id: &MaterialId,
        result: &QuizResult,
    ) -> Result<RecordedAttempt, StudyError> {
        let attempt = QuizAttempt::new(material_id.clone(), result.clone(), self.clock.now());
        let local_id = self.attempts.append_attempt(&attempt).await?;

        let forwarded = match self.recorder.record_attempt(&attempt).await {
            Ok(()) => true,
            Err(err) => {
                warn!(material = %material_id, error = %err, "failed to forward quiz attempt");
                false
            }
        };
        info!(
            material = %material_id,
            score = result.score(),
            total = result.total_questions(),
            forwarded,
            "quiz attempt recorded"
        );

        Ok(RecordedAttempt {
            local_id,
            attempt,
            forwarded,
        })
    }

    /// Past attempts for one material, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Storage` if history cannot be read.
    pub async fn history(
        &self,
        material_id: &MaterialId,
        limit: u32,
    ) -> Result<Vec<AttemptRow>, StudyError> {
        Ok(self.attempts.list_attempts(material_id, limit).await?)
    }

    /// Most recent attempt for each material.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Storage` if history cannot be read.
    pub async fn latest_attempts(&self) -> Result<Vec<AttemptRow>, StudyError> {
        Ok(self.attempts.list_latest_attempts().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBackend, flashcard_material, quiz_material};
    use storage::repository::InMemoryRepository;
    use study_core::model::Grade;
    use study_core::session::{SessionError, SubmitReason};
    use study_core::time::fixed_now;

    fn service(backend: &Arc<FakeBackend>, repo: &Arc<InMemoryRepository>) -> StudyService {
        StudyService::new(
            Clock::fixed(fixed_now()),
            backend.clone(),
            repo.clone(),
            backend.clone(),
        )
    }

    fn fixtures() -> (Arc<FakeBackend>, Arc<InMemoryRepository>) {
        let backend = Arc::new(FakeBackend::with_materials(vec![
            flashcard_material("deck", "Deck"),
            quiz_material("quiz", "Quiz"),
        ]));
        (backend, Arc::new(InMemoryRepository::new()))
    }

    #[tokio::test]
    async fn start_quiz_applies_time_limit() {
        let (backend, repo) = fixtures();
        let study = service(&backend, &repo).with_quiz_minutes(2);

        let (material, session) = study
            .start_quiz(&MaterialId::new("quiz").unwrap())
            .await
            .unwrap();

        assert_eq!(material.title, "Quiz");
        assert_eq!(session.remaining_seconds(), Some(120));
    }

    #[tokio::test]
    async fn zero_minutes_means_untimed() {
        let (backend, repo) = fixtures();
        let study = service(&backend, &repo).with_quiz_minutes(0);

        let (_, session) = study
            .start_quiz(&MaterialId::new("quiz").unwrap())
            .await
            .unwrap();
        assert_eq!(session.remaining_seconds(), None);
    }

    #[tokio::test]
    async fn wrong_kind_is_rejected() {
        let (backend, repo) = fixtures();
        let study = service(&backend, &repo);

        let err = study
            .start_flashcards(&MaterialId::new("quiz").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StudyError::WrongKind {
                expected: MaterialKind::Flashcard,
                found: MaterialKind::Quiz
            }
        ));
    }

    #[tokio::test]
    async fn empty_deck_surfaces_session_error() {
        let mut empty = flashcard_material("empty", "Empty");
        empty.data = study_core::model::MaterialData::Flashcards(Vec::new());
        let backend = Arc::new(FakeBackend::with_materials(vec![empty]));
        let repo = Arc::new(InMemoryRepository::new());
        let study = service(&backend, &repo);

        let err = study
            .start_flashcards(&MaterialId::new("empty").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StudyError::Session(SessionError::Empty)));
    }

    #[tokio::test]
    async fn submit_persists_and_forwards() {
        let (backend, repo) = fixtures();
        let study = service(&backend, &repo);
        let id = MaterialId::new("quiz").unwrap();
        let (_, mut session) = study.start_quiz(&id).await.unwrap();
        session.select_option(0, 1).unwrap();
        session.select_option(1, 0).unwrap();

        let recorded = study.submit_quiz(&id, &mut session).await.unwrap();

        assert!(recorded.forwarded);
        assert_eq!(recorded.attempt.completed_at(), fixed_now());
        assert_eq!(session.submitted_by(), Some(SubmitReason::Manual));
        assert_eq!(backend.recorded_attempts().len(), 1);

        let history = study.history(&id, 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, recorded.local_id);
        assert_eq!(history[0].attempt.result(), session.result().unwrap());
    }

    #[tokio::test]
    async fn recorder_failure_does_not_fail_submission() {
        let (backend, repo) = fixtures();
        backend.fail_recording();
        let study = service(&backend, &repo);
        let id = MaterialId::new("quiz").unwrap();
        let (_, mut session) = study.start_quiz(&id).await.unwrap();

        let recorded = study.submit_quiz(&id, &mut session).await.unwrap();

        assert!(!recorded.forwarded);
        assert_eq!(recorded.attempt.result().score(), 0);
        assert_eq!(recorded.attempt.result().grade_band(), Grade::F);
        assert_eq!(study.latest_attempts().await.unwrap().len(), 1);
    }
}
