use study_core::model::{
    AccessToken, Credentials, MaterialId, QuizAttempt, QuizResult, User, UserId,
};
use sqlx::Row;

use crate::repository::{AttemptRow, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn count_to_i64(field: &'static str, v: usize) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn count_from_i64(field: &'static str, v: i64) -> Result<usize, StorageError> {
    usize::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

/// Answers are stored as a JSON array with `null` for unanswered slots.
pub(crate) fn answers_to_json(answers: &[Option<usize>]) -> Result<String, StorageError> {
    serde_json::to_string(answers).map_err(ser)
}

fn answers_from_json(raw: &str) -> Result<Vec<Option<usize>>, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn map_attempt_row(row: &sqlx::sqlite::SqliteRow) -> Result<AttemptRow, StorageError> {
    let material_id =
        MaterialId::new(row.try_get::<String, _>("material_id").map_err(ser)?).map_err(ser)?;
    let score = count_from_i64("score", row.try_get("score").map_err(ser)?)?;
    let total = count_from_i64("total_questions", row.try_get("total_questions").map_err(ser)?)?;
    let answers = answers_from_json(&row.try_get::<String, _>("answers").map_err(ser)?)?;
    let result = QuizResult::from_persisted(score, total, answers).map_err(ser)?;

    Ok(AttemptRow::new(
        row.try_get("id").map_err(ser)?,
        QuizAttempt::new(
            material_id,
            result,
            row.try_get("completed_at").map_err(ser)?,
        ),
    ))
}

pub(crate) fn map_credentials_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<Credentials, StorageError> {
    let user = User {
        id: UserId::new(row.try_get::<String, _>("user_id").map_err(ser)?).map_err(ser)?,
        email: row.try_get("email").map_err(ser)?,
        name: row.try_get("name").map_err(ser)?,
        created_at: row.try_get("user_created_at").map_err(ser)?,
    };
    Ok(Credentials {
        access_token: AccessToken::new(row.try_get::<String, _>("access_token").map_err(ser)?),
        user,
    })
}
