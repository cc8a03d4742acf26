use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use services::api::{
    AttemptRecorder, GenerateRequest, MaterialApi, MaterialDraft, MaterialPage, MaterialUpdate,
};
use services::{ApiError, Clock, MaterialStats, QuizTimer, StudyService, TimerExit};
use storage::repository::InMemoryRepository;
use study_core::model::{
    ContentId, Grade, MaterialData, MaterialId, MaterialKind, QuizAttempt, QuizQuestion,
    StudyMaterial,
};
use study_core::session::SubmitReason;
use study_core::time::fixed_now;

/// Serves a single three-question quiz and keeps forwarded attempts.
#[derive(Default)]
struct SingleQuiz {
    forwarded: Mutex<Vec<QuizAttempt>>,
}

fn quiz() -> StudyMaterial {
    let question = |text: &str, correct| {
        QuizQuestion::new(
            text,
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct,
            None,
        )
        .unwrap()
    };
    StudyMaterial {
        id: MaterialId::new("quiz-1").unwrap(),
        content_id: ContentId::new("content-1").unwrap(),
        title: "Chapter 3".into(),
        folder: None,
        tags: vec!["exam".into()],
        created_at: fixed_now(),
        data: MaterialData::Quiz(vec![question("Q1", 1), question("Q2", 0), question("Q3", 2)]),
    }
}

fn unsupported() -> ApiError {
    ApiError::InvalidRequest("unsupported in this test".into())
}

#[async_trait]
impl MaterialApi for SingleQuiz {
    async fn list_materials(
        &self,
        _query: &services::MaterialQuery,
    ) -> Result<MaterialPage, ApiError> {
        Ok(MaterialPage {
            materials: vec![quiz()],
            ..MaterialPage::default()
        })
    }

    async fn get_material(&self, id: &MaterialId) -> Result<StudyMaterial, ApiError> {
        let material = quiz();
        if &material.id == id {
            Ok(material)
        } else {
            Err(unsupported())
        }
    }

    async fn update_material(
        &self,
        _id: &MaterialId,
        _update: &MaterialUpdate,
    ) -> Result<StudyMaterial, ApiError> {
        Err(unsupported())
    }

    async fn delete_material(&self, _id: &MaterialId) -> Result<(), ApiError> {
        Err(unsupported())
    }

    async fn folders(&self) -> Result<Vec<String>, ApiError> {
        Ok(Vec::new())
    }

    async fn tags(&self) -> Result<Vec<String>, ApiError> {
        Ok(vec!["exam".into()])
    }

    async fn stats(&self) -> Result<MaterialStats, ApiError> {
        Ok(MaterialStats::from_materials(&[quiz()]))
    }

    async fn generate(
        &self,
        _content_id: &ContentId,
        _kind: MaterialKind,
        _request: &GenerateRequest,
    ) -> Result<MaterialData, ApiError> {
        Err(unsupported())
    }

    async fn save_generated(
        &self,
        _content_id: &ContentId,
        _draft: &MaterialDraft,
    ) -> Result<StudyMaterial, ApiError> {
        Err(unsupported())
    }
}

#[async_trait]
impl AttemptRecorder for SingleQuiz {
    async fn record_attempt(&self, attempt: &QuizAttempt) -> Result<(), ApiError> {
        self.forwarded.lock().unwrap().push(attempt.clone());
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn timed_quiz_auto_submits_and_records_attempt() {
    let backend = Arc::new(SingleQuiz::default());
    let history = Arc::new(InMemoryRepository::new());
    let study = StudyService::new(
        Clock::fixed(fixed_now()),
        backend.clone(),
        history,
        backend.clone(),
    )
    .with_quiz_minutes(1);

    let id = MaterialId::new("quiz-1").unwrap();
    let (material, mut session) = study.start_quiz(&id).await.unwrap();
    assert_eq!(material.title, "Chapter 3");

    session.select_option(0, 1).unwrap();
    session.next();
    session.select_current(0).unwrap();

    let started = tokio::time::Instant::now();
    let exit = QuizTimer::new().run(|| session.tick()).await;
    assert_eq!(exit, TimerExit::Expired);
    assert_eq!(started.elapsed(), Duration::from_secs(60));
    assert_eq!(session.submitted_by(), Some(SubmitReason::Timeout));

    let result = session.result().cloned().unwrap();
    assert_eq!(result.score(), 2);
    assert_eq!(result.total_questions(), 3);
    assert_eq!(result.percentage(), 67);
    assert_eq!(result.grade_band(), Grade::D);

    let recorded = study.record_result(&id, &result).await.unwrap();
    assert!(recorded.forwarded);
    assert_eq!(backend.forwarded.lock().unwrap().len(), 1);

    let rows = study.history(&id, 5).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].attempt.result().answers(), &[Some(1), Some(0), None]);
}
