use study_core::model::{MaterialId, QuizAttempt};

use super::{
    SqliteRepository,
    mapping::{answers_to_json, count_to_i64, map_attempt_row},
};
use crate::repository::{AttemptRepository, AttemptRow, StorageError};

#[async_trait::async_trait]
impl AttemptRepository for SqliteRepository {
    async fn append_attempt(&self, attempt: &QuizAttempt) -> Result<i64, StorageError> {
        let result = attempt.result();

        let res = sqlx::query(
            r"
                INSERT INTO quiz_attempts (
                    material_id, score, total_questions, answers, completed_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(attempt.material_id().as_str())
        .bind(count_to_i64("score", result.score())?)
        .bind(count_to_i64("total_questions", result.total_questions())?)
        .bind(answers_to_json(result.answers())?)
        .bind(attempt.completed_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn get_attempt(&self, id: i64) -> Result<QuizAttempt, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, material_id, score, total_questions, answers, completed_at
                FROM quiz_attempts
                WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        Ok(map_attempt_row(&row)?.attempt)
    }

    async fn list_attempts(
        &self,
        material_id: &MaterialId,
        limit: u32,
    ) -> Result<Vec<AttemptRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, material_id, score, total_questions, answers, completed_at
                FROM quiz_attempts
                WHERE material_id = ?1
                ORDER BY completed_at DESC, id DESC
                LIMIT ?2
            ",
        )
        .bind(material_id.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_attempt_row(&row)?);
        }
        Ok(out)
    }

    async fn list_latest_attempts(&self) -> Result<Vec<AttemptRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT a.id, a.material_id, a.score, a.total_questions, a.answers, a.completed_at
                FROM quiz_attempts a
                WHERE a.id = (
                    SELECT b.id FROM quiz_attempts b
                    WHERE b.material_id = a.material_id
                    ORDER BY b.completed_at DESC, b.id DESC
                    LIMIT 1
                )
                ORDER BY a.material_id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_attempt_row(&row)?);
        }
        Ok(out)
    }
}
