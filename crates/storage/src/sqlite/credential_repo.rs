use chrono::Utc;
use study_core::model::Credentials;

use super::{SqliteRepository, mapping::map_credentials_row};
use crate::repository::{CredentialStore, StorageError};

#[async_trait::async_trait]
impl CredentialStore for SqliteRepository {
    async fn load(&self) -> Result<Option<Credentials>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT access_token, user_id, email, name, user_created_at
                FROM credentials
                WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_credentials_row).transpose()
    }

    async fn save(&self, credentials: &Credentials) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO credentials (
                    id, access_token, user_id, email, name, user_created_at, saved_at
                )
                VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(id) DO UPDATE SET
                    access_token = excluded.access_token,
                    user_id = excluded.user_id,
                    email = excluded.email,
                    name = excluded.name,
                    user_created_at = excluded.user_created_at,
                    saved_at = excluded.saved_at
            ",
        )
        .bind(credentials.access_token.expose())
        .bind(credentials.user.id.as_str())
        .bind(&credentials.user.email)
        .bind(&credentials.user.name)
        .bind(credentials.user.created_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM credentials WHERE id = 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
