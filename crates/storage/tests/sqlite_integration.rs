use chrono::Duration;
use study_core::model::{AccessToken, Credentials, MaterialId, QuizAttempt, QuizResult, User, UserId};
use study_core::time::fixed_now;
use storage::repository::{AttemptRepository, CredentialStore, Storage, StorageError};
use storage::sqlite::SqliteRepository;

fn attempt(material: &str, answers: Vec<Option<usize>>, score: usize, minutes: i64) -> QuizAttempt {
    let total = answers.len();
    QuizAttempt::new(
        MaterialId::new(material).unwrap(),
        QuizResult::from_persisted(score, total, answers).unwrap(),
        fixed_now() + Duration::minutes(minutes),
    )
}

fn credentials(token: &str) -> Credentials {
    Credentials {
        access_token: AccessToken::new(token),
        user: User {
            id: UserId::new("64f0c2").unwrap(),
            email: "grace@example.com".into(),
            name: "Grace".into(),
            created_at: fixed_now(),
        },
    }
}

#[tokio::test]
async fn sqlite_attempt_roundtrip_keeps_unanswered_slots() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_attempts?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let original = attempt("mat-1", vec![Some(1), None, Some(0)], 2, 0);
    let id = repo.append_attempt(&original).await.unwrap();

    let fetched = repo.get_attempt(id).await.expect("fetch");
    assert_eq!(fetched, original);
    assert_eq!(fetched.result().unanswered(), 1);
    assert_eq!(fetched.result().percentage(), 67);
}

#[tokio::test]
async fn sqlite_lists_history_newest_first_with_limit() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_history?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    for (minutes, score) in [(0, 0), (5, 1), (10, 2)] {
        repo.append_attempt(&attempt("mat-1", vec![Some(0), Some(0)], score, minutes))
            .await
            .unwrap();
    }
    repo.append_attempt(&attempt("mat-2", vec![Some(0)], 1, 3))
        .await
        .unwrap();

    let material = MaterialId::new("mat-1").unwrap();
    let rows = repo.list_attempts(&material, 2).await.unwrap();
    let scores: Vec<usize> = rows.iter().map(|r| r.attempt.result().score()).collect();
    assert_eq!(scores, vec![2, 1]);

    let latest = repo.list_latest_attempts().await.unwrap();
    assert_eq!(latest.len(), 2);
    assert_eq!(latest[0].attempt.material_id().as_str(), "mat-1");
    assert_eq!(latest[0].attempt.result().score(), 2);
    assert_eq!(latest[1].attempt.material_id().as_str(), "mat-2");
}

#[tokio::test]
async fn sqlite_missing_attempt_is_not_found() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_missing?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(matches!(
        repo.get_attempt(999).await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn sqlite_credentials_replace_and_clear() {
    let storage = Storage::sqlite("sqlite:file:memdb_credentials?mode=memory&cache=shared")
        .await
        .expect("storage");

    assert!(storage.credentials.load().await.unwrap().is_none());

    storage.credentials.save(&credentials("first")).await.unwrap();
    storage.credentials.save(&credentials("second")).await.unwrap();
    let loaded = storage.credentials.load().await.unwrap().expect("saved");
    assert_eq!(loaded.access_token.expose(), "second");
    assert_eq!(loaded.user.name, "Grace");

    storage.credentials.clear().await.unwrap();
    assert!(storage.credentials.load().await.unwrap().is_none());
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate_twice?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first");
    repo.migrate().await.expect("second");
}
